//! Tool store port
//!
//! The registry agents discover and call tools through. Registration
//! under an existing name replaces the earlier entry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use toolbridge_domain::page::FollowUp;
use toolbridge_domain::tool::entities::{ToolCall, ToolDefinition};
use toolbridge_domain::tool::value_objects::InvocationResult;

/// Outcome of running a tool: the envelope returned to the agent and the
/// page action to perform once it has been returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub result: InvocationResult,
    pub follow_up: Option<FollowUp>,
}

impl Execution {
    pub fn new(result: InvocationResult, follow_up: Option<FollowUp>) -> Self {
        Self { result, follow_up }
    }

    /// An envelope with no page action.
    pub fn only(result: InvocationResult) -> Self {
        Self::new(result, None)
    }
}

/// Executes one registered tool.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the tool. Never fails: errors come back as error envelopes.
    async fn invoke(&self, call: &ToolCall) -> Execution;
}

/// A tool as stored: its definition, its JSON Schema and its executor.
#[derive(Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub input_schema: serde_json::Value,
    pub invoker: Arc<dyn ToolInvoker>,
}

impl RegisteredTool {
    pub fn name(&self) -> &str {
        self.definition.name()
    }
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("definition", &self.definition)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Port for the tool registry.
pub trait ToolStorePort: Send + Sync {
    /// Store `tool`, returning the entry it replaced.
    fn register(&self, tool: RegisteredTool) -> Option<RegisteredTool>;

    fn get(&self, name: &str) -> Option<RegisteredTool>;

    /// All tools, sorted by name.
    fn list(&self) -> Vec<RegisteredTool>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
