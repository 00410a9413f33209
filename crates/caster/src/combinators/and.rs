//! AND combinator - sequential composition of casters
//!
//! [`And`] evaluates its left caster and feeds the produced value into the
//! right one. The first failure is returned as is; the right caster is never
//! evaluated after a left failure.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let positive = to_integer() & check(|v| v.as_i64().is_some_and(|n| n > 0));
//! assert_eq!(positive.call("42")?.value(), Some(&Value::Int(42)));
//! assert!(positive.call("-1")?.is_invalid());
//! ```

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

/// Feeds the value of `left` into `right`.
///
/// Built with [`Schema::and`] or the `&` operator.
#[derive(Debug, Clone)]
pub struct And {
    left: Schema,
    right: Schema,
}

impl And {
    pub fn new(left: Schema, right: Schema) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &Schema {
        &self.left
    }

    pub fn right(&self) -> &Schema {
        &self.right
    }
}

impl Cast for And {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match self.left.cast(input, rt)? {
            CastResult::Valid(value) => self.right.cast(value, rt),
            invalid @ CastResult::Invalid(_) => Ok(invalid),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.left.json_schema()?.apply(self.right.json_schema()?)
    }
}

/// Chains all `casters` with AND, left to right.
///
/// An empty list passes its input through.
pub fn and_all(casters: impl IntoIterator<Item = Schema>) -> Schema {
    casters
        .into_iter()
        .reduce(|chain, next| chain.and(next))
        .unwrap_or_else(crate::casters::pass)
}
