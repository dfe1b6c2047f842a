//! Nested mapping → dotted-path property map.
//!
//! Mapping keys are joined with `.`; sequence elements use their zero-based
//! index as the path segment (`servers.0`, `servers.1`). Empty mappings and
//! empty sequences contribute nothing.

use serde_yaml::{Mapping, Value};

use crate::types::FlattenedProperties;

/// Flatten `nested` into a single-level property map.
pub fn flatten(nested: &Mapping) -> FlattenedProperties {
    let mut out = FlattenedProperties::new();
    flatten_mapping(nested, None, &mut out);
    out
}

fn flatten_mapping(map: &Mapping, prefix: Option<&str>, out: &mut FlattenedProperties) {
    for (key, value) in map {
        let path = join(prefix, &key_segment(key));
        flatten_value(value, path, out);
    }
}

fn flatten_value(value: &Value, path: String, out: &mut FlattenedProperties) {
    match value {
        Value::Mapping(map) => flatten_mapping(map, Some(&path), out),
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, join(Some(&path), &index.to_string()), out);
            }
        }
        scalar => {
            out.insert(path, scalar_to_json(scalar));
        }
    }
}

fn join(prefix: Option<&str>, segment: &str) -> String {
    match prefix {
        Some(p) => format!("{p}.{segment}"),
        None => segment.to_string(),
    }
}

/// Render a mapping key as a path segment.
fn key_segment(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => to_yaml_text(other),
    }
}

/// Convert a leaf into a JSON value. Tagged values become strings.
fn scalar_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Number(n) => number_to_json(n),
        other => serde_json::Value::String(to_yaml_text(other)),
    }
}

fn number_to_json(n: &serde_yaml::Number) -> serde_json::Value {
    if let Some(i) = n.as_i64() {
        serde_json::Value::from(i)
    } else if let Some(u) = n.as_u64() {
        serde_json::Value::from(u)
    } else {
        // NaN and infinities have no JSON form.
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(n.to_string()))
    }
}

fn to_yaml_text(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}
