//! Domain layer for toolbridge
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Declarative tools
//!
//! Server-rendered pages mark forms, links and buttons with `tool-name`,
//! `tool-description` and `tool-param-*` attributes. Each marked element
//! becomes a tool an external agent can call:
//!
//! - **Page model** ([`page`]): owned forms, controls, links and buttons,
//!   plus the agent payload embedded in response documents
//! - **Tool model** ([`tool`]): sanitized names, inferred parameter
//!   schemas, the argument codec and the result envelope

pub mod config;
pub mod page;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::{BridgeSettings, ConfigIssue, ConfigIssueCode, Severity};
pub use page::{
    AgentPayload, AnnotatedElement, ButtonElement, FollowUp, FormControl, FormElement, FormMethod,
    LinkElement, PageDocument, PayloadError, SelectOption,
};
pub use tool::{
    ContentBlock, ControlAssignment, DefaultToolValidator, FieldDescriptor, FieldFormat,
    FieldKind, FieldPattern, InvocationResult, ParamSchema, SchemaIssue, ToolCall,
    ToolDefinition, ToolError, ToolKind, ToolName, ToolValidator,
};
