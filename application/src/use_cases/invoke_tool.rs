//! Invoke Tool use case.
//!
//! Dispatches an agent's call to the registered tool:
//!
//! 1. Look the tool up (`NOT_FOUND` envelope if absent)
//! 2. Validate the arguments against its schema (`INVALID_ARGUMENT`)
//! 3. Run the tool's executor
//! 4. Hand any follow-up to the [`NavigationScheduler`]
//!
//! The returned [`Invocation`] holds the follow-up's gate. Navigation
//! starts only once the caller drops it, so the caller always has the
//! envelope before the page moves.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use toolbridge_domain::tool::entities::ToolCall;
use toolbridge_domain::tool::traits::{DefaultToolValidator, ToolValidator};
use toolbridge_domain::tool::value_objects::{InvocationResult, ToolError};
use tracing::{info, warn};

use super::navigation::{NavigationGate, NavigationScheduler};
use crate::ports::tool_store::ToolStorePort;

/// A resolved invocation.
///
/// Derefs to its [`InvocationResult`]. Dropping it releases the
/// scheduled follow-up navigation, if any.
#[derive(Debug)]
pub struct Invocation {
    result: InvocationResult,
    gate: Option<NavigationGate>,
}

impl Invocation {
    fn resolved(result: InvocationResult) -> Self {
        Self { result, gate: None }
    }

    pub fn result(&self) -> &InvocationResult {
        &self.result
    }

    /// Whether a navigation is waiting on this invocation.
    pub fn has_follow_up(&self) -> bool {
        self.gate.is_some()
    }
}

impl Deref for Invocation {
    type Target = InvocationResult;

    fn deref(&self) -> &InvocationResult {
        &self.result
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            gate.release();
        }
    }
}

impl From<ToolError> for Invocation {
    fn from(error: ToolError) -> Self {
        Self::resolved(error.into())
    }
}

pub struct InvokeToolUseCase {
    store: Arc<dyn ToolStorePort>,
    scheduler: Arc<NavigationScheduler>,
    validator: DefaultToolValidator,
}

impl InvokeToolUseCase {
    pub fn new(store: Arc<dyn ToolStorePort>, scheduler: Arc<NavigationScheduler>) -> Self {
        Self {
            store,
            scheduler,
            validator: DefaultToolValidator,
        }
    }

    pub async fn execute(&self, call: ToolCall) -> Invocation {
        let Some(tool) = self.store.get(&call.tool_name) else {
            warn!("Unknown tool '{}'", call.tool_name);
            return ToolError::not_found(&call.tool_name).into();
        };

        if let Err(message) = self.validator.validate(&call, &tool.definition) {
            warn!("Rejected call to '{}': {}", call.tool_name, message);
            return ToolError::invalid_argument(message).into();
        }

        info!("Invoking {} tool '{}'", tool.definition.kind, call.tool_name);
        let started = Instant::now();
        let execution = tool.invoker.invoke(&call).await;
        info!(
            "Tool '{}' finished in {}ms{}",
            call.tool_name,
            started.elapsed().as_millis(),
            if execution.result.is_error() { " with error" } else { "" }
        );

        Invocation {
            result: execution.result,
            gate: execution
                .follow_up
                .map(|follow_up| self.scheduler.schedule(follow_up)),
        }
    }

    /// Wait for follow-up navigations scheduled so far.
    ///
    /// Only navigations whose [`Invocation`] has been dropped can finish.
    pub async fn settle(&self) {
        self.scheduler.settle().await;
    }
}
