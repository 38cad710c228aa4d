//! Watch configuration from TOML (`[watch]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use toolbridge_domain::config::{ConfigIssue, ConfigIssueCode};

/// Raw watch configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWatchConfig {
    /// Seconds between polls of the page
    pub interval_secs: u64,
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl FileWatchConfig {
    /// Poll interval; never below one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.interval_secs > 0 {
            return Vec::new();
        }
        vec![ConfigIssue::warning(
            ConfigIssueCode::ZeroDuration {
                field: "watch.interval_secs".to_string(),
            },
            "watch.interval_secs is 0, polling every second instead",
        )]
    }
}
