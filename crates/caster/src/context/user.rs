//! User-supplied context variables.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::{ContextFrame, Runtime, VariableBag};
use crate::value::Value;

#[derive(Debug)]
struct Variables(Arc<IndexMap<String, Value>>);

impl VariableBag for Variables {
    fn variable(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl ContextFrame for Variables {
    fn as_variable_bag(&self) -> Option<&dyn VariableBag> {
        Some(self)
    }
}

/// Makes variables readable by every caster below it.
///
/// Nested contexts shadow outer ones key by key: a lookup missing from the
/// inner bag continues to the outer one.
#[derive(Debug, Clone)]
pub struct UserContext {
    base: Schema,
    vars: Arc<IndexMap<String, Value>>,
}

impl UserContext {
    pub fn new(base: Schema, vars: IndexMap<String, Value>) -> Self {
        Self {
            base,
            vars: Arc::new(vars),
        }
    }
}

impl Cast for UserContext {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let frame = Variables(Arc::clone(&self.vars));
        let (_, result) = rt.with_frame(frame, |rt| self.base.cast(input, rt))?;
        result
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}
