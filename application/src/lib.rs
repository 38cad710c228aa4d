//! Application layer for toolbridge
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use ports::{
    document_parser::DocumentParserPort,
    fetch::{CredentialsMode, FetchPort, FetchRequest, FetchResponse},
    frame_host::{FrameHostPort, LoadedDocument, SurfaceGuard, SurfaceId},
    host_error::HostError,
    navigator::NavigatorPort,
    tool_schema::ToolSchemaPort,
    tool_store::{Execution, RegisteredTool, ToolInvoker, ToolStorePort},
};
pub use use_cases::invoke_tool::{Invocation, InvokeToolUseCase};
pub use use_cases::navigation::{NavigationGate, NavigationScheduler};
pub use use_cases::observe_mutations::{DomMutation, MutationObserver};
pub use use_cases::register_tools::{RegistrationError, ToolRegistrar, ToolRegistrarBuilder};
pub use use_cases::scan_page::{ScanPageError, ScanPageUseCase};
