//! Bridge wire conventions

use std::time::Duration;

use super::validation::{ConfigIssue, ConfigIssueCode};
use crate::page::payload::AGENT_RESPONSE_ID;
use crate::page::request::{AGENT_PARAM, TOOL_HEADER};

/// Token in a link tool's name that selects direct navigation.
pub const NAVIGATION_MARKER: &str = "navigate";

/// Conventions shared between the bridge and the collaborating endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Query parameter set to `true` on every agent-originated request
    pub agent_param: String,
    /// Id of the script element carrying the response payload
    pub result_element_id: String,
    /// Link tools whose raw name contains this navigate instead of fetching
    pub navigation_marker: String,
    /// Header set to `true` on direct-fetch submissions
    pub tool_header: String,
    /// Pause between resolving an invocation and its redirect or reload
    pub settle_delay: Duration,
    /// Upper bound on a navigation surface load; `None` waits forever
    pub submit_timeout: Option<Duration>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            agent_param: AGENT_PARAM.to_string(),
            result_element_id: AGENT_RESPONSE_ID.to_string(),
            navigation_marker: NAVIGATION_MARKER.to_string(),
            tool_header: TOOL_HEADER.to_string(),
            settle_delay: Duration::from_millis(100),
            submit_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl BridgeSettings {
    /// Whether a link tool with this raw name navigates directly.
    pub fn is_navigation(&self, raw_tool_name: &str) -> bool {
        raw_tool_name.contains(self.navigation_marker.as_str())
    }

    /// Check the settings, returning every issue found.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("bridge.agent_param", &self.agent_param),
            ("bridge.result_element_id", &self.result_element_id),
            ("bridge.navigation_marker", &self.navigation_marker),
            ("bridge.tool_header", &self.tool_header),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{}: must not be empty", field),
                ));
            }
        }

        let header_ok = self
            .tool_header
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c));
        if !self.tool_header.is_empty() && !header_ok {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidHeaderName {
                    value: self.tool_header.clone(),
                },
                format!("bridge.tool_header: '{}' is not a valid header name", self.tool_header),
            ));
        }

        issues
    }
}
