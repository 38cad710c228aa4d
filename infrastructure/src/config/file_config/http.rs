//! HTTP client configuration from TOML (`[http]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use toolbridge_domain::config::{ConfigIssue, ConfigIssueCode};

/// Raw HTTP client configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("toolbridge/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl FileHttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration {
                    field: "http.timeout_secs".to_string(),
                },
                "http.timeout_secs cannot be 0",
            ));
        }
        issues
    }
}
