//! Error-aggregating AND
//!
//! [`Aggregate`] behaves like [`And`](super::And) on success. When the left
//! caster fails, the right one still runs on the original input so that all
//! errors are collected, e.g. every failing field of a hash split across
//! several `hash_schema`s.

use crate::foundation::{Cast, CastResult, Schema, SchemaError, merge_errors};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

/// AND that merges the errors of both sides.
///
/// Built with [`Schema::aggregate`] or the `*` operator.
#[derive(Debug, Clone)]
pub struct Aggregate {
    left: Schema,
    right: Schema,
}

impl Aggregate {
    pub fn new(left: Schema, right: Schema) -> Self {
        Self { left, right }
    }
}

impl Cast for Aggregate {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match self.left.cast(input.clone(), rt)? {
            CastResult::Valid(value) => self.right.cast(value, rt),
            CastResult::Invalid(left) => match self.right.cast(input, rt)? {
                CastResult::Valid(_) => Ok(CastResult::Invalid(left)),
                CastResult::Invalid(right) => Ok(CastResult::Invalid(merge_errors(
                    Some(left),
                    Some(right),
                ))),
            },
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.left.json_schema()?.apply(self.right.json_schema()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ErrorTree;
    use crate::casters::{check, hash_schema, integer};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_collects_both_sides() {
        let schema = hash_schema([("a", integer())]) * hash_schema([("b", integer())]);
        let result = schema.call(Value::from(json!({"a": "x", "b": "y"}))).unwrap();
        let errors = result.raw_errors().unwrap();
        assert!(errors.get("a").is_some());
        assert!(errors.get("b").is_some());
    }

    #[test]
    fn test_left_failure_kept_when_right_passes() {
        let left = check(|_| false).map_errors(|_| "left".into());
        let result = (left * check(|_| true)).call(1).unwrap();
        assert_eq!(result.raw_errors(), Some(&ErrorTree::from("left")));
    }

    #[test]
    fn test_lists_are_unioned() {
        let left = check(|_| false).map_errors(|_| "same".into());
        let right = check(|_| false).map_errors(|_| "same".into());
        let result = (left * right).call(1).unwrap();
        assert_eq!(result.raw_errors(), Some(&ErrorTree::from("same")));
    }
}
