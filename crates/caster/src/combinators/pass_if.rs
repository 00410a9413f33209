//! PASS_IF combinator - validate without transforming

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

/// Runs `base` for its verdict only; on success the original input is
/// returned, whatever `base` produced.
#[derive(Debug, Clone)]
pub struct PassIf {
    base: Schema,
}

impl PassIf {
    pub fn new(base: Schema) -> Self {
        Self { base }
    }
}

impl Cast for PassIf {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match self.base.cast(input.clone(), rt)? {
            CastResult::Valid(_) => Ok(CastResult::valid(input)),
            invalid @ CastResult::Invalid(_) => Ok(invalid),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }
}

/// Creates a PASS_IF combinator.
pub fn pass_if(base: impl Into<Schema>) -> Schema {
    Schema::new(PassIf::new(base.into()))
}
