//! Presentation layer for toolbridge
//!
//! This crate contains the CLI definition, argument parsing and
//! console output formatting.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::arguments::{ArgumentError, parse_arguments};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
