//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::naming::ToolName;
use super::schema::ParamSchema;

/// Which kind of element a tool was discovered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// `form[tool-name]`: submitted on a navigation surface
    Form,
    /// `a[tool-name]`: fetched, or navigated to directly
    Link,
    /// `button[tool-name]`: submits its form by fetch, or is clicked
    Button,
}

impl ToolKind {
    pub fn as_str(&self) -> &str {
        match self {
            ToolKind::Form => "form",
            ToolKind::Link => "link",
            ToolKind::Button => "button",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration arguments of a discovered tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Sanitized, protocol-safe name
    pub name: ToolName,
    /// Display title derived from the name
    pub title: String,
    /// Author-supplied description, possibly empty
    pub description: String,
    /// Parameter schema (empty for links and buttons)
    pub input_schema: ParamSchema,
    pub kind: ToolKind,
}

impl ToolDefinition {
    pub fn new(name: ToolName, description: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            title: name.title(),
            name,
            description: description.into(),
            input_schema: ParamSchema::new(),
            kind,
        }
    }

    pub fn with_schema(mut self, schema: ParamSchema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A tool invocation request from an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments keyed by sanitized field name
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Take arguments from a JSON object; any other value yields none.
    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = arguments {
            self.arguments.extend(map);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.arguments.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::elements::FormControl;
    use crate::tool::schema::describe_control;
    use serde_json::json;

    #[test]
    fn test_tool_definition() {
        let name = ToolName::parse("add todo").unwrap();
        let (field, _) = describe_control(&FormControl::input("text").named("text").required());
        let def = ToolDefinition::new(name, "Add a new todo item", ToolKind::Form)
            .with_schema(ParamSchema::new().with_field(field.unwrap()));

        assert_eq!(def.name(), "add_todo");
        assert_eq!(def.title, "Add Todo");
        assert_eq!(def.input_schema.len(), 1);
        assert_eq!(def.kind.to_string(), "form");
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("add-todo")
            .with_arg("text", "buy milk")
            .with_arguments(json!({"done": true}));

        assert_eq!(call.get_string("text"), Some("buy milk"));
        assert_eq!(call.get("done"), Some(&json!(true)));
        assert!(call.get("missing").is_none());
    }

    #[test]
    fn test_tool_call_ignores_non_object_arguments() {
        let call = ToolCall::new("x").with_arguments(json!([1, 2]));
        assert!(call.arguments.is_empty());
    }
}
