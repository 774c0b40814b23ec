//! Query-string encoding for ClickUp filter options.
//!
//! ClickUp expects array filters as repeated keys, so
//! `statuses: ["open", "closed"]` must become `statuses=open&statuses=closed`
//! rather than a single comma-joined value.

use serde::Serialize;
use serde_json::Value;

use super::error::ClickUpError;

/// Flatten a serializable options struct into ordered `(key, value)` pairs
pub fn to_query_pairs<T: Serialize>(options: &T) -> Result<Vec<(String, String)>, ClickUpError> {
    let value = serde_json::to_value(options).map_err(|e| ClickUpError::Decode {
        message: format!("Failed to encode query options: {}", e),
    })?;

    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                push_value(&mut pairs, &key, value);
            }
        }
        Value::Null => {}
        other => {
            return Err(ClickUpError::Decode {
                message: format!("Query options must be an object, got {}", other),
            })
        }
    }
    Ok(pairs)
}

fn push_value(pairs: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                if let Some(text) = scalar_to_string(item) {
                    pairs.push((key.to_string(), text));
                }
            }
        }
        other => {
            if let Some(text) = scalar_to_string(other) {
                pairs.push((key.to_string(), text));
            }
        }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Nested structures (e.g. custom field filters) travel JSON-encoded
        other => Some(other.to_string()),
    }
}
