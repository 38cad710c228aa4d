//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async invocation ports are defined in the application layer.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Required parameters must be present and non-null; every supplied
/// parameter the schema knows must satisfy its descriptor. Unknown
/// arguments are ignored.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for field in definition.input_schema.iter() {
            match call.arguments.get(&field.name) {
                None | Some(serde_json::Value::Null) if field.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        field.name, definition.name
                    ));
                }
                None => {}
                Some(value) => field.check(value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::elements::FormControl;
    use crate::tool::entities::ToolKind;
    use crate::tool::naming::ToolName;
    use crate::tool::schema::{PARAM_ENUM_ATTR, ParamSchema, describe_control};

    fn definition(controls: Vec<FormControl>) -> ToolDefinition {
        let schema = controls.iter().fold(ParamSchema::new(), |schema, control| {
            schema.with_field(describe_control(control).0.unwrap())
        });
        ToolDefinition::new(ToolName::parse("test").unwrap(), "test tool", ToolKind::Form)
            .with_schema(schema)
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let definition = definition(vec![FormControl::input("text").named("text").required()]);

        let result = validator.validate(&ToolCall::new("test"), &definition);
        assert!(result.unwrap_err().contains("Missing required parameter 'text'"));

        let null = ToolCall::new("test").with_arg("text", serde_json::Value::Null);
        assert!(validator.validate(&null, &definition).is_err());
    }

    #[test]
    fn test_validator_ignores_unknown_params() {
        let validator = DefaultToolValidator;
        let definition = definition(vec![FormControl::input("text").named("known")]);

        let call = ToolCall::new("test").with_arg("unknown_param", "value");
        assert!(validator.validate(&call, &definition).is_ok());
    }

    #[test]
    fn test_validator_rejects_null_optional() {
        let validator = DefaultToolValidator;
        let definition = definition(vec![FormControl::input("text").named("note")]);

        let call = ToolCall::new("test").with_arg("note", serde_json::Value::Null);
        assert!(validator.validate(&call, &definition).is_err());
    }

    #[test]
    fn test_validator_type_checks() {
        let validator = DefaultToolValidator;
        let definition = definition(vec![
            FormControl::input("text").named("text").required(),
            FormControl::input("checkbox").named("done"),
            FormControl::input("text").named("role").with_attr(PARAM_ENUM_ATTR, "admin,viewer"),
        ]);

        let valid = ToolCall::new("test")
            .with_arg("text", "write docs")
            .with_arg("done", true)
            .with_arg("role", "admin");
        assert!(validator.validate(&valid, &definition).is_ok());

        let wrong_type = ToolCall::new("test").with_arg("text", "x").with_arg("done", "yes");
        assert!(validator.validate(&wrong_type, &definition).unwrap_err().contains("boolean"));

        let bad_enum = ToolCall::new("test").with_arg("text", "x").with_arg("role", "root");
        assert!(validator.validate(&bad_enum, &definition).is_err());
    }
}
