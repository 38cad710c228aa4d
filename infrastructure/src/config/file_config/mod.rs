//! Raw TOML configuration data types
//!
//! These structs mirror the config file. Conversion to domain settings
//! happens in the section types.

mod bridge;
mod http;
mod watch;

pub use bridge::FileBridgeConfig;
pub use http::FileHttpConfig;
pub use watch::FileWatchConfig;

use serde::{Deserialize, Serialize};
use toolbridge_domain::config::{BridgeSettings, ConfigIssue};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Wire conventions shared with the page's endpoints
    pub bridge: FileBridgeConfig,
    /// HTTP client settings
    pub http: FileHttpConfig,
    /// `watch` command settings
    pub watch: FileWatchConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_bridge_settings().validate();
        issues.extend(self.http.validate());
        issues.extend(self.watch.validate());
        issues
    }

    pub fn to_bridge_settings(&self) -> BridgeSettings {
        self.bridge.to_settings()
    }
}
