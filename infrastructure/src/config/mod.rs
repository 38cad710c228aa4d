//! Configuration file loading for toolbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `TOOLBRIDGE_*` environment variables (`TOOLBRIDGE_BRIDGE__AGENT_PARAM=...`)
//! 3. Project root: `./toolbridge.toml` or `./.toolbridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/toolbridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileBridgeConfig, FileConfig, FileHttpConfig, FileWatchConfig};
pub use loader::ConfigLoader;
