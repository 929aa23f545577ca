//! Output contracts.
//!
//! Descriptors use the generation service's schema dialect (`OBJECT`, `ARRAY`,
//! `STRING`, `INTEGER`, `NUMBER`, `BOOLEAN`). A `null` optional field counts as
//! absent; a `null` required field counts as missing.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Constraint, FieldError, ValidationError};

/// Typed output with a declarative response schema.
pub trait OutputSchema: DeserializeOwned {
    /// Schema sent to the service and used to check its answer.
    fn schema() -> Value;
}

/// Check `value` against `schema`, reporting every violation.
pub fn check_conformance(schema: &Value, value: &Value) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_node(schema, value, "", &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "response"
    } else {
        path
    }
}

fn check_node(schema: &Value, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    let ty = schema
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_ascii_uppercase)
        .unwrap_or_default();

    let type_error = |name: &'static str| FieldError::new(display_path(path), Constraint::ExpectedType(name));

    match ty.as_str() {
        "OBJECT" => {
            let Some(object) = value.as_object() else {
                errors.push(type_error("object"));
                return;
            };

            let required: Vec<&str> = schema
                .get("required")
                .and_then(Value::as_array)
                .map(|r| r.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            for key in &required {
                if object.get(*key).map_or(true, Value::is_null) {
                    errors.push(FieldError::new(child_path(path, key), Constraint::Required));
                }
            }

            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (key, property) in properties {
                    match object.get(key) {
                        Some(field) if !field.is_null() => {
                            check_node(property, field, &child_path(path, key), errors)
                        }
                        _ => {}
                    }
                }
            }
        }
        "ARRAY" => {
            let Some(items) = value.as_array() else {
                errors.push(type_error("array"));
                return;
            };
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", display_path(path), i);
                    check_node(item_schema, item, &item_path, errors);
                }
            }
        }
        "STRING" if !value.is_string() => errors.push(type_error("string")),
        "INTEGER" if !(value.is_i64() || value.is_u64()) => errors.push(type_error("integer")),
        "NUMBER" if !value.is_number() => errors.push(type_error("number")),
        "BOOLEAN" if !value.is_boolean() => errors.push(type_error("boolean")),
        _ => {}
    }
}
