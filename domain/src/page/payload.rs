//! Agent response payload embedded in server-rendered HTML
//!
//! Endpoints that see `agent=true` render a `<script id="agent-response">`
//! element whose text is a JSON object. Recognized keys are `success` and
//! `redirect_url`; everything else is domain data passed through to the agent.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Default id of the result-bearing script element.
pub const AGENT_RESPONSE_ID: &str = "agent-response";

/// Errors reading a payload out of a response document.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid agent response JSON: {0}")]
    InvalidJson(String),
}

/// JSON payload extracted from a response document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentPayload(Value);

impl AgentPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse the text content of the result element.
    pub fn parse(text: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(text.trim())
            .map(Self)
            .map_err(|e| PayloadError::InvalidJson(e.to_string()))
    }

    /// Payload assumed for a form submission whose response carries none.
    pub fn form_default() -> Self {
        Self(json!({ "success": true }))
    }

    /// Payload assumed for a link fetch whose response carries none.
    pub fn link_default() -> Self {
        Self(json!({}))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn success(&self) -> Option<bool> {
        self.0.get("success").and_then(Value::as_bool)
    }

    /// Redirect target, if the payload carries a non-empty `redirect_url`.
    pub fn redirect_url(&self) -> Option<&str> {
        self.0
            .get("redirect_url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
    }

    /// What the page should do once the invocation has resolved.
    pub fn follow_up(&self) -> FollowUp {
        match self.redirect_url() {
            Some(url) => FollowUp::Navigate(url.to_string()),
            None => FollowUp::Reload,
        }
    }

    /// Two-space indented JSON, the text carried by result envelopes.
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Top-level page action performed after an invocation resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Navigate the top-level page to this (possibly relative) URL.
    Navigate(String),
    /// Reload the current page so it reflects the mutation.
    Reload,
}
