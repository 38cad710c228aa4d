//! Typed value ↔ form control codec
//!
//! Tool arguments arrive as JSON values; form controls hold strings and a
//! checked state. [`encode`] turns an argument into a [`ControlAssignment`]
//! for a specific control, [`decode`] reads a control back as a typed value.

use serde_json::{Number, Value};

use crate::page::elements::FormControl;

/// Value conventionally submitted by a checked checkbox.
pub const CHECKED_VALUE: &str = "1";

/// What to write into a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAssignment {
    /// Checkbox state. A `value` replaces the control's submitted value.
    Check {
        checked: bool,
        value: Option<String>,
    },
    /// Plain value (text, number, select, textarea, ...).
    Value(String),
}

impl ControlAssignment {
    /// Apply the assignment to a control.
    ///
    /// For selects, the option whose value matches is selected and all
    /// others deselected; no match leaves nothing selected.
    pub fn apply(&self, control: &mut FormControl) {
        match self {
            ControlAssignment::Check { checked, value } => {
                control.checked = *checked;
                if let Some(value) = value {
                    control.value = value.clone();
                }
            }
            ControlAssignment::Value(value) => {
                if control.is_select() {
                    let mut matched = false;
                    for option in &mut control.options {
                        option.selected = !matched && option.value == *value;
                        matched |= option.selected;
                    }
                } else if control.is_number() && !value.is_empty() && value.parse::<f64>().is_err() {
                    // Number inputs sanitize unparseable values to empty
                    control.value = String::new();
                } else {
                    control.value = value.clone();
                }
            }
        }
    }
}

/// Encode an argument for `control`.
///
/// Checkboxes take the truthiness of the value, and a truthy value also
/// sets the submitted value to `"1"`. Every other control receives the
/// value's string form.
pub fn encode(control: &FormControl, value: &Value) -> ControlAssignment {
    if control.is_checkbox() {
        let checked = is_truthy(value);
        return ControlAssignment::Check {
            checked,
            value: checked.then(|| CHECKED_VALUE.to_string()),
        };
    }
    ControlAssignment::Value(stringify(value))
}

/// Decode the current state of `control` into a typed value.
///
/// Checkboxes decode to booleans, number inputs to numbers (`null` when
/// empty or unparseable), everything else to strings.
pub fn decode(control: &FormControl) -> Value {
    if control.is_checkbox() {
        return Value::Bool(control.checked);
    }
    if control.is_number() {
        return control
            .value
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(number_value)
            .unwrap_or(Value::Null);
    }
    Value::String(control.current_value())
}

/// Truthiness of a JSON value: `false`, `0`, `""` and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a JSON value as written into a form control.
///
/// Strings pass through untouched (no trimming), numbers drop a redundant
/// fractional part, `null` becomes empty, arrays join their items with
/// commas and objects serialize as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

fn number_value(f: f64) -> Option<Value> {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        Some(Value::from(f as i64))
    } else {
        Number::from_f64(f).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::elements::SelectOption;
    use serde_json::json;

    #[test]
    fn test_encode_checkbox() {
        let checkbox = FormControl::input("checkbox").named("done");
        assert_eq!(
            encode(&checkbox, &json!(true)),
            ControlAssignment::Check {
                checked: true,
                value: Some("1".to_string())
            }
        );
        assert_eq!(
            encode(&checkbox, &json!(false)),
            ControlAssignment::Check {
                checked: false,
                value: None
            }
        );
        assert!(matches!(
            encode(&checkbox, &json!("yes")),
            ControlAssignment::Check { checked: true, .. }
        ));
        assert!(matches!(
            encode(&checkbox, &json!(0)),
            ControlAssignment::Check { checked: false, .. }
        ));
    }

    #[test]
    fn test_encode_number() {
        let number = FormControl::input("number").named("qty");
        assert_eq!(encode(&number, &json!(3)), ControlAssignment::Value("3".to_string()));
        assert_eq!(encode(&number, &json!(2.5)), ControlAssignment::Value("2.5".to_string()));
        assert_eq!(encode(&number, &json!(4.0)), ControlAssignment::Value("4".to_string()));
    }

    #[test]
    fn test_encode_string_is_not_trimmed() {
        let text = FormControl::input("text").named("text");
        assert_eq!(
            encode(&text, &json!("  buy milk ")),
            ControlAssignment::Value("  buy milk ".to_string())
        );
        assert_eq!(encode(&text, &Value::Null), ControlAssignment::Value(String::new()));
        assert_eq!(encode(&text, &json!(["a", 1])), ControlAssignment::Value("a,1".to_string()));
    }

    #[test]
    fn test_apply_assignments() {
        let mut checkbox = FormControl::input("checkbox").named("done").with_value("on");
        encode(&checkbox.clone(), &json!(true)).apply(&mut checkbox);
        assert!(checkbox.checked);
        assert_eq!(checkbox.value, "1");

        let mut select = FormControl::select(vec![
            SelectOption::new("low").selected(),
            SelectOption::new("high"),
        ])
        .named("priority");
        ControlAssignment::Value("high".to_string()).apply(&mut select);
        assert_eq!(select.current_value(), "high");
        assert!(!select.options[0].selected);

        let mut number = FormControl::input("number").named("n");
        ControlAssignment::Value("abc".to_string()).apply(&mut number);
        assert_eq!(number.value, "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(&FormControl::input("checkbox").checked()), json!(true));
        assert_eq!(decode(&FormControl::input("number").with_value("7")), json!(7));
        assert_eq!(decode(&FormControl::input("number").with_value("1.5")), json!(1.5));
        assert_eq!(decode(&FormControl::input("number")), Value::Null);
        assert_eq!(decode(&FormControl::textarea().with_value("hi")), json!("hi"));
    }

    #[test]
    fn test_encode_then_decode_preserves_typed_values() {
        let cases = [
            (FormControl::input("checkbox"), json!(true)),
            (FormControl::input("number"), json!(12)),
            (FormControl::input("text"), json!("write docs")),
        ];
        for (mut control, value) in cases {
            encode(&control.clone(), &value).apply(&mut control);
            assert_eq!(decode(&control), value);
        }
    }
}
