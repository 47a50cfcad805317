//! Schema validator for document writes
//!
//! Validation semantics:
//! - Undeclared fields are dropped
//! - Defaults fill absent fields
//! - Values are cast to the declared type where an obvious cast exists
//! - Every failed field yields exactly one message; all are reported together
//!
//! The validator mutates the document it checks (casts, trims, defaults) so
//! that what is stored is exactly what was validated.

use serde_json::{Number, Value};
use uuid::Uuid;

use super::errors::ValidationDetails;
use super::types::{FieldDef, FieldType, Schema};
use crate::store::Document;

/// Enforces one schema on documents.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Normalizes and validates a full document.
    ///
    /// # Errors
    ///
    /// Returns one [`ValidationDetails`] per failed field, in declaration order.
    pub fn check(&self, doc: &mut Document) -> Result<(), Vec<ValidationDetails>> {
        let mut failures = Vec::new();

        doc.retain(|key, _| self.schema.is_declared(key));

        for (name, def) in self.schema.fields() {
            if !doc.contains_key(name) {
                if let Some(default) = &def.default {
                    doc.insert(name.to_string(), default.clone());
                }
            }

            let Some(value) = doc.get_mut(name) else {
                if let Some(message) = &def.required {
                    failures.push(ValidationDetails::new(name, message.clone()));
                }
                continue;
            };

            if is_blank(value) {
                if let Some(message) = &def.required {
                    failures.push(ValidationDetails::new(name, message.clone()));
                }
                continue;
            }

            match cast(name, value, def) {
                Ok(cast_value) => *value = cast_value,
                Err(details) => {
                    failures.push(details);
                    continue;
                }
            }

            if let Some(details) = check_rules(name, value, def) {
                failures.push(details);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Casts a value to the declared field type.
fn cast(field: &str, value: &Value, def: &FieldDef) -> Result<Value, ValidationDetails> {
    let failed = || ValidationDetails::cast_failed(field, def.field_type.type_name(), value);

    match def.field_type {
        FieldType::String => cast_string(value, def.trim).ok_or_else(failed),
        FieldType::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => parse_number(s.trim()).ok_or_else(failed),
            _ => Err(failed()),
        },
        FieldType::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.trim() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(failed()),
            },
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(Value::Bool(true)),
                Some(0) => Ok(Value::Bool(false)),
                _ => Err(failed()),
            },
            _ => Err(failed()),
        },
        FieldType::Reference => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(|id| Value::String(id.to_string()))
            .ok_or_else(failed),
        FieldType::StringArray => match value {
            Value::String(_) => cast_string(value, def.trim)
                .map(|s| Value::Array(vec![s]))
                .ok_or_else(failed),
            Value::Array(items) => items
                .iter()
                .map(|item| cast_string(item, def.trim))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
                .ok_or_else(failed),
            _ => Err(failed()),
        },
        FieldType::Object => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err(failed()),
        },
    }
}

fn cast_string(value: &Value, trim: bool) -> Option<Value> {
    let s = match value {
        Value::String(s) if trim => s.trim().to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(Value::String(s))
}

/// Parse a number, preferring an integer representation
pub(crate) fn parse_number(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Applies the value constraints, returning the first failure
fn check_rules(field: &str, value: &Value, def: &FieldDef) -> Option<ValidationDetails> {
    if let Value::String(s) = value {
        if let Some(rule) = &def.max_length {
            if s.chars().count() > rule.limit {
                return Some(ValidationDetails::new(field, rule.message.clone()));
            }
        }
        if let Some(rule) = &def.pattern {
            if !rule.limit.is_match(s) {
                return Some(ValidationDetails::new(field, rule.message.clone()));
            }
        }
    }

    if let Some(allowed) = &def.one_of {
        let members: Vec<&str> = match value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if let Some(bad) = members.into_iter().find(|m| !allowed.contains(m)) {
            return Some(ValidationDetails::not_allowed(field, bad));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(rule) = &def.min {
            if n < rule.limit {
                return Some(ValidationDetails::new(field, rule.message.clone()));
            }
        }
        if let Some(rule) = &def.max {
            if n > rule.limit {
                return Some(ValidationDetails::new(field, rule.message.clone()));
            }
        }
    }

    None
}
