//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod document_parser;
pub mod fetch;
pub mod frame_host;
pub mod host_error;
pub mod navigator;
pub mod tool_schema;
pub mod tool_store;
