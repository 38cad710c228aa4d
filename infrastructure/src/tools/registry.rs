//! In-memory tool registry
//!
//! Implements [`ToolStorePort`]: the name-keyed table agents discover and
//! call tools through. Registration under an existing name replaces the
//! earlier entry, so the most recent element with a given name wins.

use std::collections::BTreeMap;
use std::sync::RwLock;

use toolbridge_application::ports::tool_store::{RegisteredTool, ToolStorePort};
use tracing::warn;

#[derive(Default)]
pub struct InMemoryToolStore {
    tools: RwLock<BTreeMap<String, RegisteredTool>>,
}

impl InMemoryToolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all registered tools, sorted.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, RegisteredTool>> {
        self.tools.read().unwrap_or_else(|poisoned| {
            warn!("Tool registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl ToolStorePort for InMemoryToolStore {
    fn register(&self, tool: RegisteredTool) -> Option<RegisteredTool> {
        let mut tools = self
            .tools
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tools.insert(tool.name().to_string(), tool)
    }

    fn get(&self, name: &str) -> Option<RegisteredTool> {
        self.read().get(name).cloned()
    }

    fn list(&self) -> Vec<RegisteredTool> {
        self.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use toolbridge_application::ports::tool_store::{Execution, ToolInvoker};
    use toolbridge_domain::tool::entities::{ToolCall, ToolDefinition, ToolKind};
    use toolbridge_domain::tool::naming::ToolName;
    use toolbridge_domain::tool::value_objects::InvocationResult;

    struct Echo(&'static str);

    #[async_trait]
    impl ToolInvoker for Echo {
        async fn invoke(&self, _call: &ToolCall) -> Execution {
            Execution::only(InvocationResult::text(self.0))
        }
    }

    fn tool(name: &str, marker: &'static str) -> RegisteredTool {
        RegisteredTool {
            definition: ToolDefinition::new(ToolName::parse(name).unwrap(), marker, ToolKind::Link),
            input_schema: serde_json::json!({"type": "object"}),
            invoker: Arc::new(Echo(marker)),
        }
    }

    #[test]
    fn test_register_and_get() {
        let store = InMemoryToolStore::new();
        assert!(store.is_empty());
        assert!(store.register(tool("delete-todo", "a")).is_none());

        let found = store.get("delete-todo").unwrap();
        assert_eq!(found.definition.description, "a");
        assert!(store.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_later_registration_wins() {
        let store = InMemoryToolStore::new();
        store.register(tool("refresh", "first"));
        let replaced = store.register(tool("refresh", "second")).unwrap();
        assert_eq!(replaced.definition.description, "first");

        assert_eq!(store.len(), 1);
        let execution = store
            .get("refresh")
            .unwrap()
            .invoker
            .invoke(&ToolCall::new("refresh"))
            .await;
        assert_eq!(execution.result.first_text(), Some("second"));
    }

    #[test]
    fn test_list_is_sorted() {
        let store = InMemoryToolStore::new();
        store.register(tool("toggle", "t"));
        store.register(tool("add-todo", "a"));
        store.register(tool("clear", "c"));

        assert_eq!(store.names(), vec!["add-todo", "clear", "toggle"]);
        let listed: Vec<_> = store.list().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(listed, store.names());
    }
}
