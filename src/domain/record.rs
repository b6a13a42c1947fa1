//! Schemaless records exchanged with the storage backends

use serde_json::{Map, Number, Value};

/// A single stored item: a JSON object keyed by attribute name
pub type Record = Map<String, Value>;

/// Renders a scalar attribute the way identifiers are compared.
///
/// Strings are returned as-is, numbers and booleans in their JSON text form,
/// except that integral floats drop their fraction (`1.0` renders as `1`).
/// Null, arrays and objects have no key form and yield `None`.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_string(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn number_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

/// Returns the key form of `record[field]`, if present and scalar
pub fn field_string(record: &Record, field: &str) -> Option<String> {
    record.get(field).and_then(key_string)
}

/// Like [`field_string`] but treats falsy values (`0`, `false`, `""`) as absent
pub fn truthy_string(record: &Record, field: &str) -> Option<String> {
    let value = record.get(field)?;

    let falsy = match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Null => true,
        Value::Array(_) | Value::Object(_) => false,
    };

    if falsy { None } else { key_string(value) }
}

/// True when `record[field]` stringifies equal to `expected`
pub fn field_matches(record: &Record, field: &str, expected: &str) -> bool {
    field_string(record, field).is_some_and(|v| v == expected)
}

/// Shallow merge: every key of `updates` overwrites the one in `base`
pub fn merge(mut base: Record, updates: &Record) -> Record {
    for (key, value) in updates {
        base.insert(key.clone(), value.clone());
    }
    base
}

/// Converts a JSON value into a record, rejecting anything but an object
pub fn into_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
