//! Tool schema conversion port.
//!
//! Separates "what a tool accepts" (domain [`ParamSchema`]) from "how to
//! serialize it for agents" (JSON Schema, infrastructure).

use toolbridge_domain::tool::entities::ToolDefinition;
use toolbridge_domain::tool::schema::ParamSchema;

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// JSON Schema object describing a parameter schema.
    fn input_schema(&self, schema: &ParamSchema) -> serde_json::Value;

    /// Full tool description: name, title, description and input schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to a JSON Schema array (sorted by name).
    fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        let mut sorted: Vec<_> = tools.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
