//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`], producing the JSON Schema
//! agents see for each registered tool.
//!
//! Descriptor → JSON Schema mapping:
//! - `kind` → `"type"` (`string`, `number`, `boolean`), omitted when the
//!   field has an `enum`
//! - `min`/`max` → `minLength`/`maxLength` for strings,
//!   `minimum`/`maximum` for numbers
//! - `format`, `pattern`, `enum`, `default`, `description` copied as is
//! - required fields listed under `"required"`

use serde_json::{Map, Value, json};
use toolbridge_application::ports::tool_schema::ToolSchemaPort;
use toolbridge_domain::tool::entities::ToolDefinition;
use toolbridge_domain::tool::schema::{FieldDescriptor, FieldKind, ParamSchema};

pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    fn property(field: &FieldDescriptor) -> Value {
        let mut prop = Map::new();

        match &field.enum_values {
            Some(values) => {
                prop.insert("enum".to_string(), json!(values));
            }
            None => {
                prop.insert("type".to_string(), json!(field.kind.as_str()));
            }
        }

        let (min_key, max_key) = match field.kind {
            FieldKind::Number => ("minimum", "maximum"),
            _ => ("minLength", "maxLength"),
        };
        if field.kind != FieldKind::Boolean && field.enum_values.is_none() {
            if let Some(min) = field.min {
                prop.insert(min_key.to_string(), bound(min, field.kind));
            }
            if let Some(max) = field.max {
                prop.insert(max_key.to_string(), bound(max, field.kind));
            }
        }

        if let Some(format) = field.format {
            prop.insert("format".to_string(), json!(format.as_str()));
        }
        if let Some(pattern) = &field.pattern {
            prop.insert("pattern".to_string(), json!(pattern));
        }
        if let Some(default) = &field.default {
            prop.insert("default".to_string(), default.clone());
        }
        prop.insert("description".to_string(), json!(field.description));

        Value::Object(prop)
    }
}

/// Length bounds are integers in JSON Schema; numeric bounds keep their
/// fractional part.
fn bound(value: f64, kind: FieldKind) -> Value {
    if kind == FieldKind::Number {
        json!(value)
    } else {
        json!(value.max(0.0) as u64)
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn input_schema(&self, schema: &ParamSchema) -> Value {
        let properties: Map<String, Value> = schema
            .iter()
            .map(|field| (field.name.clone(), Self::property(field)))
            .collect();
        let required: Vec<&str> = schema.required_names().collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        json!({
            "name": tool.name,
            "title": tool.title,
            "description": tool.description,
            "inputSchema": self.input_schema(&tool.input_schema),
        })
    }
}
