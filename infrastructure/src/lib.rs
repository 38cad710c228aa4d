//! Infrastructure layer for toolbridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod page;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileBridgeConfig, FileConfig, FileHttpConfig, FileWatchConfig};
pub use page::{DocumentDiff, DocumentWatcher, HttpPageHost, ScraperDocumentParser};
pub use tools::{InMemoryToolStore, JsonSchemaToolConverter};
