//! Tool arguments from the command line
//!
//! `--arg KEY=VALUE` values arrive as text. Each is typed by the tool's
//! parameter schema: numbers and booleans are parsed for fields of those
//! kinds, everything else stays a string. Text that does not parse is
//! passed through unchanged so the validator can report it.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use toolbridge_domain::tool::schema::{FieldKind, ParamSchema};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Argument '{0}' is not in KEY=VALUE form")]
    MissingValue(String),

    #[error("--json must be a JSON object: {0}")]
    InvalidJson(String),
}

/// Build the argument object for a call from `--json` and `--arg` values.
pub fn parse_arguments(
    schema: &ParamSchema,
    pairs: &[String],
    json: Option<&str>,
) -> Result<Map<String, Value>, ArgumentError> {
    let mut arguments = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(ArgumentError::InvalidJson(format!("got {}", other))),
            Err(e) => return Err(ArgumentError::InvalidJson(e.to_string())),
        },
        None => Map::new(),
    };

    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| ArgumentError::MissingValue(pair.clone()))?;
        let kind = schema
            .get(key)
            .filter(|field| field.enum_values.is_none())
            .map(|field| field.kind);
        arguments.insert(key.to_string(), typed(raw, kind));
    }

    Ok(arguments)
}

fn typed(raw: &str, kind: Option<FieldKind>) -> Value {
    let parsed = match kind {
        Some(FieldKind::Number) => raw.trim().parse::<f64>().ok().and_then(|n| {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(Value::from(n as i64))
            } else {
                Number::from_f64(n).map(Value::Number)
            }
        }),
        Some(FieldKind::Boolean) => match raw.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}
