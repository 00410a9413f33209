//! Error tree post-processing.

use std::fmt;
use std::sync::Arc;

use crate::foundation::{Cast, CastResult, ErrorTree, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

type MapFn = dyn Fn(ErrorTree) -> ErrorTree + Send + Sync;

/// Rewrites the error tree of a failed result with a closure.
#[derive(Clone)]
pub struct MapErrors {
    base: Schema,
    map: Arc<MapFn>,
}

impl MapErrors {
    pub fn new(base: Schema, map: impl Fn(ErrorTree) -> ErrorTree + Send + Sync + 'static) -> Self {
        Self {
            base,
            map: Arc::new(map),
        }
    }
}

impl Cast for MapErrors {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match self.base.cast(input, rt)? {
            valid @ CastResult::Valid(_) => Ok(valid),
            CastResult::Invalid(errors) => Ok(CastResult::invalid((self.map)(errors))),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

impl fmt::Debug for MapErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapErrors")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
