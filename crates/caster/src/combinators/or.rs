//! OR combinator - alternatives
//!
//! [`Or`] returns the left result when it is valid. Otherwise the right
//! caster runs on the original input and its result is returned as is: on a
//! double failure the left errors are discarded.

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

/// Tries `right` when `left` fails.
///
/// Built with [`Schema::or`] or the `|` operator.
#[derive(Debug, Clone)]
pub struct Or {
    left: Schema,
    right: Schema,
}

impl Or {
    pub fn new(left: Schema, right: Schema) -> Self {
        Self { left, right }
    }
}

impl Cast for Or {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let left = self.left.cast(input.clone(), rt)?;
        if left.is_valid() {
            return Ok(left);
        }
        self.right.cast(input, rt)
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::any_of(vec![
            self.left.json_schema()?,
            self.right.json_schema()?,
        ]))
    }

    fn is_optional(&self) -> bool {
        self.left.is_optional() || self.right.is_optional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ErrorTree;
    use crate::casters::{check, integer, string};

    #[test]
    fn test_or_returns_first_success() {
        let schema = integer() | string();
        assert!(schema.call(1).unwrap().is_valid());
        assert!(schema.call("a").unwrap().is_valid());
        assert!(schema.call(true).unwrap().is_invalid());
    }

    #[test]
    fn test_or_right_biased_on_double_failure() {
        let left = check(|_| false).map_errors(|_| "L".into());
        let right = check(|_| false).map_errors(|_| "R".into());
        let result = (left | right).call(0).unwrap();
        assert_eq!(result.raw_errors(), Some(&ErrorTree::from("R")));
    }
}
