//! Bridge conventions from TOML (`[bridge]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use toolbridge_domain::config::BridgeSettings;

/// Raw bridge configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBridgeConfig {
    /// Query parameter marking agent requests
    pub agent_param: String,
    /// Id of the element carrying the response payload
    pub result_element_id: String,
    /// Link tool names containing this navigate directly
    pub navigation_marker: String,
    /// Header sent by direct-fetch submissions
    pub tool_header: String,
    /// Delay between resolution and redirect/reload
    pub settle_delay_ms: u64,
    /// Surface load timeout (0 disables)
    pub submit_timeout_secs: u64,
}

impl Default for FileBridgeConfig {
    fn default() -> Self {
        let settings = BridgeSettings::default();
        Self {
            agent_param: settings.agent_param,
            result_element_id: settings.result_element_id,
            navigation_marker: settings.navigation_marker,
            tool_header: settings.tool_header,
            settle_delay_ms: settings.settle_delay.as_millis() as u64,
            submit_timeout_secs: settings.submit_timeout.map_or(0, |t| t.as_secs()),
        }
    }
}

impl FileBridgeConfig {
    pub fn to_settings(&self) -> BridgeSettings {
        BridgeSettings {
            agent_param: self.agent_param.clone(),
            result_element_id: self.result_element_id.clone(),
            navigation_marker: self.navigation_marker.clone(),
            tool_header: self.tool_header.clone(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            submit_timeout: (self.submit_timeout_secs > 0)
                .then(|| Duration::from_secs(self.submit_timeout_secs)),
        }
    }
}
