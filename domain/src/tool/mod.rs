//! Tool domain module
//!
//! How an annotated element becomes a tool an agent can call.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ FormElement  │───▶│ ParamSchema  │───▶│ ToolDefinition   │
//! │ (page model) │    │ (inference)  │    │ (name/title/...) │
//! └──────────────┘    └──────────────┘    └────────┬─────────┘
//!                                                  │
//!                     ┌──────────────┐    ┌────────▼─────────┐
//!                     │ ControlAssign│◀───│ ToolCall         │
//!                     │ (codec)      │    │ (validated args) │
//!                     └──────────────┘    └──────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolName`]: sanitized identifier matching `^[A-Za-z0-9_.-]{1,64}$`
//! - [`ParamSchema`] / [`FieldDescriptor`]: typed parameters inferred from
//!   form controls and `tool-param-*` attributes
//! - [`ControlAssignment`]: the codec's output, written into a cloned form
//! - [`InvocationResult`]: the uniform `{content, isError?}` envelope
//! - [`ToolValidator`]: checks a [`ToolCall`] against its definition
//!
//! Everything here is pure; executing a tool needs I/O and lives in the
//! application layer.

pub mod codec;
pub mod entities;
pub mod naming;
pub mod schema;
pub mod traits;
pub mod value_objects;

pub use codec::ControlAssignment;
pub use entities::{ToolCall, ToolDefinition, ToolKind};
pub use naming::{ToolName, display_title, sanitize_identifier};
pub use schema::{FieldDescriptor, FieldFormat, FieldKind, FieldPattern, ParamSchema, SchemaIssue};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ContentBlock, InvocationResult, ToolError};
