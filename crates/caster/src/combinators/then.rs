//! THEN/ELSE combinator - conditional casting
//!
//! `cond.then(a).otherwise(b)` runs `a` on the value produced by `cond` when
//! `cond` succeeds, and `b` on the original input when it fails. The else
//! branch is mandatory.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let normalized = Schema::from(
//!     string()
//!         .then(transform(|v| Value::from(v.to_string().to_lowercase())))
//!         .otherwise(to_integer())?,
//! );
//! ```

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

/// Conditional caster; see the module docs.
#[derive(Debug, Clone)]
pub struct Then {
    left: Schema,
    then: Schema,
    otherwise: Option<Schema>,
}

impl Then {
    pub fn new(left: Schema, then: Schema) -> Self {
        Self {
            left,
            then,
            otherwise: None,
        }
    }

    /// Attaches the else branch.
    ///
    /// Fails with [`SchemaError::DuplicateElse`] if one is already attached.
    pub fn otherwise(mut self, otherwise: impl Into<Schema>) -> Result<Self, SchemaError> {
        if self.otherwise.is_some() {
            return Err(SchemaError::DuplicateElse);
        }
        self.otherwise = Some(otherwise.into());
        Ok(self)
    }
}

impl Cast for Then {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let otherwise = self.otherwise.as_ref().ok_or(SchemaError::MissingElse)?;
        match self.left.cast(input.clone(), rt)? {
            CastResult::Valid(value) => self.then.cast(value, rt),
            CastResult::Invalid(_) => otherwise.cast(input, rt),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let otherwise = self.otherwise.as_ref().ok_or(SchemaError::MissingElse)?;
        let then = self.left.json_schema()?.apply(self.then.json_schema()?)?;
        Ok(JsonSchema::one_of(vec![then, otherwise.json_schema()?]))
    }
}
