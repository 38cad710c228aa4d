//! Identifier sanitization for tool and field names
//!
//! Agent protocols only accept names matching `^[A-Za-z0-9_.-]{1,64}$`.
//! Authors write whatever they like in `tool-name` / `name` attributes, so
//! every identifier goes through [`sanitize_identifier`] before use. The same
//! function is applied to tool names and field names, which lets the form
//! executor map a sanitized parameter back onto its source input by
//! re-sanitizing the input's original name.

use serde::{Deserialize, Serialize};

use crate::util::truncate_str;

/// Maximum length of a sanitized identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Character used in place of anything outside the identifier alphabet.
const REPLACEMENT: char = '_';

/// Whether `c` belongs to the identifier alphabet `[A-Za-z0-9_.-]`.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_` and truncate
/// the result to [`MAX_IDENTIFIER_LEN`] characters.
///
/// Total and idempotent. The output is pure ASCII, so truncation never
/// lands inside a multi-byte character.
pub fn sanitize_identifier(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { REPLACEMENT })
        .collect();
    truncate_str(&replaced, MAX_IDENTIFIER_LEN).to_string()
}

/// Derive a display title from a sanitized name.
///
/// Separators (`_`, `.`, `-`) become spaces and the first letter of every
/// word is uppercased: `add-todo` → `Add Todo`.
pub fn display_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        let c = if matches!(c, '_' | '.' | '-') { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                title.extend(c.to_uppercase());
            } else {
                title.push(c);
            }
            at_word_start = false;
        } else {
            title.push(c);
            at_word_start = true;
        }
    }
    title
}

/// A validated tool name: non-empty, at most 64 characters, identifier
/// alphabet only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Sanitize `raw` into a tool name.
    ///
    /// Returns `None` when nothing is left after sanitization (an empty
    /// attribute); such elements are skipped, not reported as errors.
    pub fn parse(raw: &str) -> Option<Self> {
        let sanitized = sanitize_identifier(raw);
        if sanitized.is_empty() {
            None
        } else {
            Some(Self(sanitized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title shown to agents, derived from the sanitized name.
    pub fn title(&self) -> String {
        display_title(&self.0)
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
