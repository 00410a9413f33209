//! Merging of message lists and message hashes kept under several keys.
//!
//! [`merge_message_keys`] reads the listed keys of a hash and unions what it
//! finds. If any of them holds a hash, the result is a hash merged key by
//! key, with non-hash parts collected under `base`. Otherwise the result is
//! one flat list. Nulls and absent values disappear at every level; a list
//! that ends up empty becomes absent.
//!
//! ```rust,ignore
//! let merged = merge_message_keys(["title", "subtitle"]);
//! // {"title": ["too long"], "subtitle": ["too long", "empty"]}
//! //   -> ["too long", "empty"]
//! ```

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::i18n::error_key;
use crate::runtime::Runtime;
use crate::value::{Hash, Value};

const BASE: &str = "base";

/// Caster built by [`merge_message_keys`].
#[derive(Debug, Clone)]
pub struct MessageKeysMerger {
    keys: Vec<String>,
}

impl Cast for MessageKeysMerger {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let hash = match input {
            Value::Hash(hash) => hash,
            other => {
                return Ok(CastResult::invalid(
                    error_key("hash_value").with_arg("value", other),
                ));
            }
        };

        let parts = self
            .keys
            .iter()
            .map(|key| hash.get(key).cloned().unwrap_or(Value::Absent));
        let nested = self
            .keys
            .iter()
            .any(|key| matches!(hash.get(key), Some(Value::Hash(_))));

        let merged = if nested {
            Value::Hash(parts.fold(Hash::new(), merge_into_hash))
        } else {
            parts.fold(Value::Array(Vec::new()), merge_lists)
        };
        Ok(CastResult::valid(clean(merged)))
    }
}

pub fn merge_message_keys<I, K>(keys: I) -> Schema
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    Schema::new(MessageKeysMerger {
        keys: keys.into_iter().map(Into::into).collect(),
    })
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Absent | Value::Null)
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Absent | Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Ordered union of two values seen as lists.
fn merge_lists(unit: Value, with: Value) -> Value {
    let mut merged: Vec<Value> = Vec::new();
    for item in into_list(unit).into_iter().chain(into_list(with)) {
        let item = clean(item);
        if !is_blank(&item) && !merged.contains(&item) {
            merged.push(item);
        }
    }
    if merged.is_empty() {
        Value::Absent
    } else {
        Value::Array(merged)
    }
}

fn merge_into_hash(mut result: Hash, with: Value) -> Hash {
    match with {
        Value::Hash(entries) => {
            for (key, value) in entries {
                let current = result.get(&key).cloned().unwrap_or(Value::Absent);
                result.insert(key, merge_nested(current, value));
            }
        }
        other => {
            let base = result.get(BASE).cloned().unwrap_or(Value::Absent);
            result.insert(BASE.to_owned(), merge_lists(base, other));
        }
    }
    result
}

fn merge_nested(current: Value, with: Value) -> Value {
    match with {
        Value::Hash(entries) => {
            let mut current = match current {
                Value::Hash(hash) => hash,
                _ => Hash::new(),
            };
            for (key, value) in entries {
                let existing = current.get(&key).cloned().unwrap_or(Value::Absent);
                current.insert(key, merge_nested(existing, value));
            }
            Value::Hash(current)
        }
        other => merge_lists(current, other),
    }
}

/// Drops nulls and absent values from arrays and hashes, recursively.
fn clean(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(clean)
                .filter(|item| !is_blank(item))
                .collect(),
        ),
        Value::Hash(hash) => Value::Hash(
            hash.into_iter()
                .map(|(key, item)| (key, clean(item)))
                .filter(|(_, item)| !is_blank(item))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn merge(keys: &[&str], input: serde_json::Value) -> CastResult {
        merge_message_keys(keys.iter().copied())
            .call(Value::from(input))
            .unwrap()
    }

    #[test]
    fn test_lists_and_scalars_are_unioned() {
        let result = merge(
            &["a", "b", "c"],
            json!({"a": ["x"], "b": "y", "c": ["x", null, "z"]}),
        );
        assert_eq!(result.value(), Some(&Value::from(json!(["x", "y", "z"]))));
    }

    #[test]
    fn test_hashes_merge_key_by_key() {
        let result = merge(
            &["a", "b", "c"],
            json!({
                "a": {"name": ["bad"]},
                "b": {"name": "worse", "age": ["old"], "x": null},
                "c": "top"
            }),
        );
        assert_eq!(
            result.value(),
            Some(&Value::from(json!({
                "name": ["bad", "worse"],
                "age": ["old"],
                "base": ["top"]
            })))
        );
    }

    #[test]
    fn test_nothing_to_merge_is_absent() {
        let result = merge(&["a", "b"], json!({"a": null, "other": ["x"]}));
        assert_eq!(result.value(), Some(&Value::Absent));
    }

    #[test]
    fn test_non_hash_input_fails() {
        let result = merge_message_keys(["a"]).call(1).unwrap();
        assert_eq!(
            result.raw_errors().unwrap().items().unwrap()[0].to_string(),
            ".hash_value"
        );
    }
}
