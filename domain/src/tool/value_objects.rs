//! Tool domain value objects: invocation envelope and error types
//!
//! Every invocation, successful or not, produces an [`InvocationResult`]:
//!
//! ```json
//! { "content": [{ "type": "text", "text": "<JSON>" }], "isError": true }
//! ```
//!
//! `isError` is only present on failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::page::payload::AgentPayload;

/// Error that occurred during tool invocation.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Arguments failed schema validation |
/// | `NOT_FOUND` | Unknown tool |
/// | `EXECUTION_FAILED` | Network, parse or page failure |
/// | `TIMEOUT` | Navigation surface never finished loading |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Tool not found: {}", tool.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// One block of envelope content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Uniform result envelope returned by every tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub content: Vec<ContentBlock>,
    #[serde(
        rename = "isError",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_error: bool,
}

impl InvocationResult {
    /// Success envelope with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Success envelope carrying an extracted payload.
    pub fn from_payload(payload: &AgentPayload) -> Self {
        Self::text(payload.to_pretty_string())
    }

    /// Success envelope carrying an arbitrary JSON value.
    pub fn from_json(value: Value) -> Self {
        Self::from_payload(&AgentPayload::new(value))
    }

    /// Error envelope: `Error: <message>`.
    pub fn error(error: &ToolError) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("Error: {}", error.message),
            }],
            is_error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ContentBlock::text)
    }

    /// The first text block parsed as JSON, for success envelopes.
    pub fn json(&self) -> Option<Value> {
        self.first_text()
            .and_then(|text| serde_json::from_str(text).ok())
    }
}

impl From<ToolError> for InvocationResult {
    fn from(error: ToolError) -> Self {
        Self::error(&error)
    }
}
