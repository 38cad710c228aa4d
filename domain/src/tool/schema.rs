//! Parameter schema inference from form controls
//!
//! Every non-hidden, named control of a tool form becomes a
//! [`FieldDescriptor`]. The descriptor is built in a fixed order:
//!
//! ```text
//! base kind → format → bounds → pattern → enum → required → description
//! ```
//!
//! The description is assembled last so its bracketed hints (`[number]`,
//! `[required]`, ...) reflect the resolved kind and requiredness.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec;
use super::naming::sanitize_identifier;
use crate::page::elements::{FormControl, FormElement};
use crate::util::{parse_leading_float, parse_leading_int};

pub const PARAM_TYPE_ATTR: &str = "tool-param-type";
pub const PARAM_DESCRIPTION_ATTR: &str = "tool-param-description";
pub const PARAM_FORMAT_ATTR: &str = "tool-param-format";
pub const PARAM_MIN_ATTR: &str = "tool-param-min";
pub const PARAM_MAX_ATTR: &str = "tool-param-max";
pub const PARAM_PATTERN_ATTR: &str = "tool-param-pattern";
pub const PARAM_ENUM_ATTR: &str = "tool-param-enum";

/// Selects with more options than this get no options hint.
const MAX_HINTED_OPTIONS: usize = 10;

/// Primitive kind of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    /// Parse a `tool-param-type` override. Unknown values fall back to
    /// string, the base type of anything not boolean or numeric.
    pub fn from_override(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "number" => FieldKind::Number,
            "boolean" => FieldKind::Boolean,
            _ => FieldKind::String,
        }
    }

    /// Kind implied by the control's native type.
    pub fn infer(control: &FormControl) -> Self {
        if control.is_checkbox() {
            FieldKind::Boolean
        } else if control.is_number() {
            FieldKind::Number
        } else {
            FieldKind::String
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format constraint on a string parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    Email,
    Url,
}

impl FieldFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "email" => Some(FieldFormat::Email),
            "url" => Some(FieldFormat::Url),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldFormat::Email => "email",
            FieldFormat::Url => "url",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            FieldFormat::Email => "(valid email format)",
            FieldFormat::Url => "(valid URL format)",
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => looks_like_email(value),
            FieldFormat::Url => url::Url::parse(value).is_ok(),
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// A `tool-param-pattern` regex, compiled once.
///
/// Serializes as its source text; equality compares the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPattern {
    source: String,
    regex: Regex,
}

impl FieldPattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl std::ops::Deref for FieldPattern {
    type Target = str;

    fn deref(&self) -> &str {
        &self.source
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl TryFrom<String> for FieldPattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<FieldPattern> for String {
    fn from(pattern: FieldPattern) -> Self {
        pattern.source
    }
}

impl std::fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Typed, constrained description of one tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Sanitized name exposed to agents.
    pub name: String,
    /// Original `name` attribute of the source control.
    pub source_name: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    /// Lower bound: character count for strings, value for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound: character count for strings, value for numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<FieldPattern>,
    /// Closed value set; replaces the base kind when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Value the control currently holds, when it holds one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

impl FieldDescriptor {
    /// Check a supplied argument against this descriptor.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if let Some(allowed) = &self.enum_values {
            return match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
                _ => Err(format!(
                    "'{}' must be one of: {}",
                    self.name,
                    allowed.join(", ")
                )),
            };
        }

        match self.kind {
            FieldKind::Boolean => {
                if !value.is_boolean() {
                    return Err(format!("'{}' must be a boolean", self.name));
                }
            }
            FieldKind::Number => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("'{}' must be a number", self.name))?;
                self.check_bounds(n, "")?;
            }
            FieldKind::String => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("'{}' must be a string", self.name))?;
                self.check_bounds(s.chars().count() as f64, " characters")?;
                if let Some(format) = &self.format {
                    if !format.accepts(s) {
                        return Err(format!("'{}' must be a valid {}", self.name, format.as_str()));
                    }
                }
                if let Some(pattern) = &self.pattern {
                    if !pattern.is_match(s) {
                        return Err(format!("'{}' must match pattern {}", self.name, pattern));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_bounds(&self, n: f64, unit: &str) -> Result<(), String> {
        if let Some(min) = self.min {
            if n < min {
                return Err(format!("'{}' must be at least {}{}", self.name, min, unit));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(format!("'{}' must be at most {}{}", self.name, max, unit));
            }
        }
        Ok(())
    }
}

/// Ordered mapping from sanitized field name to descriptor.
///
/// Inserting a name that is already present replaces the earlier
/// descriptor in place: when two source names sanitize to the same value,
/// the later control shadows the earlier one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSchema {
    fields: Vec<FieldDescriptor>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it shadowed.
    pub fn insert(&mut self, field: FieldDescriptor) -> Option<FieldDescriptor> {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => Some(std::mem::replace(existing, field)),
            None => {
                self.fields.push(field);
                None
            }
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.insert(field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }
}

/// Non-fatal problem found while inferring a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub field: String,
    pub message: String,
}

/// Build the parameter schema of a tool form.
///
/// Returns the schema and any issues (e.g. patterns that do not compile and
/// were dropped). Controls without a name are skipped silently.
pub fn build_param_schema(form: &FormElement) -> (ParamSchema, Vec<SchemaIssue>) {
    let mut schema = ParamSchema::new();
    let mut issues = Vec::new();

    for control in form.parameter_controls() {
        let (descriptor, control_issues) = describe_control(control);
        issues.extend(control_issues);
        if let Some(descriptor) = descriptor {
            schema.insert(descriptor);
        }
    }

    (schema, issues)
}

/// Derive the descriptor of a single control.
pub fn describe_control(control: &FormControl) -> (Option<FieldDescriptor>, Vec<SchemaIssue>) {
    let mut issues = Vec::new();
    let Some(source_name) = control.field_name() else {
        return (None, issues);
    };
    let name = sanitize_identifier(source_name);

    // 1. base kind
    let kind = control
        .attr(PARAM_TYPE_ATTR)
        .map(FieldKind::from_override)
        .unwrap_or_else(|| FieldKind::infer(control));

    // 2. format
    let format = if kind == FieldKind::String {
        control
            .attr(PARAM_FORMAT_ATTR)
            .and_then(FieldFormat::parse)
            .or_else(|| FieldFormat::parse(&control.control_type))
    } else {
        None
    };

    // 3. bounds
    let parse_bound = |raw: &str| match kind {
        FieldKind::String => parse_leading_int(raw).map(|n| n as f64),
        FieldKind::Number => parse_leading_float(raw),
        FieldKind::Boolean => None,
    };
    let min = control.attr(PARAM_MIN_ATTR).and_then(parse_bound);
    let max = control.attr(PARAM_MAX_ATTR).and_then(parse_bound);

    // 4. pattern
    let pattern = match control.attr(PARAM_PATTERN_ATTR) {
        Some(p) if kind == FieldKind::String && !p.is_empty() => match FieldPattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                issues.push(SchemaIssue {
                    field: name.clone(),
                    message: format!("pattern dropped: {}", e),
                });
                None
            }
        },
        _ => None,
    };

    // 5. enum
    let enum_values = control
        .attr(PARAM_ENUM_ATTR)
        .filter(|v| !v.is_empty())
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>());

    // 6. requiredness
    let required = control.required;

    // 7. description
    let description = describe(control, kind, format, enum_values.is_some(), required);

    let default = match codec::decode(control) {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        value => Some(value),
    };

    let descriptor = FieldDescriptor {
        name,
        source_name: source_name.to_string(),
        kind,
        required,
        format,
        min,
        max,
        pattern,
        enum_values,
        default,
        description,
    };
    (Some(descriptor), issues)
}

fn describe(
    control: &FormControl,
    kind: FieldKind,
    format: Option<FieldFormat>,
    is_enum: bool,
    required: bool,
) -> String {
    let author = control
        .attr(PARAM_DESCRIPTION_ATTR)
        .map(str::trim)
        .unwrap_or_default();

    let mut parts: Vec<String> = Vec::new();
    if author.is_empty() {
        let fallback = match control.control_type.as_str() {
            "checkbox" => "Check/uncheck option",
            "number" => "Numeric value",
            "email" => "Email address",
            "password" => "Password",
            _ => match format {
                Some(FieldFormat::Email) => "Email address",
                Some(FieldFormat::Url) => "URL",
                None => "",
            },
        };
        if !fallback.is_empty() {
            parts.push(fallback.to_string());
        }
    } else {
        parts.push(author.to_string());
        if let Some(format) = format {
            parts.push(format.hint().to_string());
        }
    }

    if control.is_select() && !control.options.is_empty() && control.options.len() <= MAX_HINTED_OPTIONS {
        let values: Vec<&str> = control.options.iter().map(|o| o.value.as_str()).collect();
        parts.push(format!("(options: {})", values.join(", ")));
    }

    if !is_enum {
        match kind {
            FieldKind::Boolean => parts.push("[boolean]".to_string()),
            FieldKind::Number => parts.push("[number]".to_string()),
            FieldKind::String => {}
        }
    }

    parts.push(if required { "[required]" } else { "[optional]" }.to_string());
    parts.join(" ")
}
