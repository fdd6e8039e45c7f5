//! Schema repair for LM-proposed relationships.
//!
//! Records missing a required endpoint or label are dropped. Optional enum
//! fields are corrected to their defaults without raising anything.
use crate::schema::{Cardinality, Category, Relationship};
use serde_json::{Map, Value};

/// Candidate relationship records inside an extracted response.
///
/// Accepts either `{"relationships": [...]}` or a bare array.
pub fn raw_relationships(value: &Value) -> &[Value] {
    match value {
        Value::Object(map) => match map.get("relationships") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        Value::Array(items) => items,
        _ => &[],
    }
}

/// Normalize every record, keeping accepted ones in their original order.
pub fn normalize_relationships(raw: &[Value]) -> Vec<Relationship> {
    let accepted: Vec<Relationship> = raw.iter().filter_map(normalize_relationship).collect();
    let dropped = raw.len() - accepted.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = accepted.len(), "dropped invalid relationships");
    }
    accepted
}

/// Normalize one record, or `None` if it cannot be a relationship.
pub fn normalize_relationship(raw: &Value) -> Option<Relationship> {
    let record = raw.as_object()?;
    let from = required_text(record, "from")?;
    let to = required_text(record, "to")?;
    let relationship = required_text(record, "relationship")?;

    let from_cardinality = enum_field(record, "fromCardinality", Cardinality::parse);
    let to_cardinality = enum_field(record, "toCardinality", Cardinality::parse);
    let category = enum_field(record, "category", Category::parse);

    Some(
        Relationship::new(from, to, relationship)
            .with_cardinality(from_cardinality, to_cardinality)
            .with_category(category),
    )
}

fn required_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match record.get(key)? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        return None;
    }
    Some(text)
}

fn enum_field<T: Default>(
    record: &Map<String, Value>,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> T {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(parse)
        .unwrap_or_default()
}
