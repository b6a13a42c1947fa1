//! Conversion between JSON records and DynamoDB attribute maps

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::domain::DomainError;
use crate::domain::record::Record;

/// DynamoDB item representation
pub type Item = HashMap<String, AttributeValue>;

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute(v)))
                .collect(),
        ),
    }
}

/// Reads an attribute back as JSON. String and number sets become arrays;
/// binary attributes have no JSON form and are rejected.
pub fn from_attribute(attribute: &AttributeValue) -> Result<Value, DomainError> {
    match attribute {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(values) => values
            .iter()
            .map(from_attribute)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => from_item(map).map(Value::Object),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        _ => Err(DomainError::storage(
            "Unsupported DynamoDB attribute type (binary or unknown)",
        )),
    }
}

pub fn to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute(v)))
        .collect()
}

pub fn from_item(item: &Item) -> Result<Record, DomainError> {
    let mut record = Map::new();

    for (key, attribute) in item {
        record.insert(key.clone(), from_attribute(attribute)?);
    }

    Ok(record)
}

fn parse_number(raw: &str) -> Result<Number, DomainError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }

    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }

    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| DomainError::storage(format!("Invalid DynamoDB number '{}'", raw)))
}
