//! Object-bound evaluation.
//!
//! A caster tree can be bound to a host object: its fields are snapshotted
//! into a frame when the call starts, casters read and update them through
//! [`Runtime::object_field`] and [`Runtime::set_object_field`], and the
//! updated fields are written back when the call returns. The object is not
//! locked while the subtree runs.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::{ContextFrame, ObjectState, Runtime};
use crate::value::{Hash, Value};

/// A host object exposing named fields to casters.
pub trait BoundObject: Send {
    /// Snapshot of the fields visible to casters.
    fn fields(&self) -> IndexMap<String, Value>;

    /// Writes fields back after the call.
    fn restore(&mut self, fields: IndexMap<String, Value>);
}

impl BoundObject for Hash {
    fn fields(&self) -> IndexMap<String, Value> {
        self.clone()
    }

    fn restore(&mut self, fields: IndexMap<String, Value>) {
        *self = fields;
    }
}

#[derive(Debug)]
struct ObjectFrame(IndexMap<String, Value>);

impl ObjectState for ObjectFrame {
    fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl ContextFrame for ObjectFrame {
    fn as_object_state(&mut self) -> Option<&mut dyn ObjectState> {
        Some(self)
    }
}

/// Runs its base with the fields of a bound object in scope.
#[derive(Clone)]
pub struct ObjectContext {
    base: Schema,
    object: Arc<Mutex<dyn BoundObject>>,
}

impl ObjectContext {
    pub fn new(base: Schema, object: Arc<Mutex<dyn BoundObject>>) -> Self {
        Self { base, object }
    }
}

impl Cast for ObjectContext {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let snapshot = self.object.lock().fields();
        let (frame, result) = rt.with_frame(ObjectFrame(snapshot), |rt| self.base.cast(input, rt))?;
        self.object.lock().restore(frame.0);
        result
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

impl fmt::Debug for ObjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectContext")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casters::{run, transform_with};

    fn counter() -> Arc<Mutex<Hash>> {
        let mut fields = Hash::new();
        fields.insert("count".to_owned(), Value::Int(0));
        Arc::new(Mutex::new(fields))
    }

    #[test]
    fn test_updates_are_written_back() {
        let object = counter();
        let bump = run(|_, rt| {
            let count = rt.object_field("count")?.as_i64().unwrap_or(0);
            rt.set_object_field("count", count + 1)
        });
        let schema = bump.with_object_context(object.clone());

        schema.call(Value::Null).unwrap();
        schema.call(Value::Null).unwrap();
        assert_eq!(object.lock().get("count"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_reads_field() {
        let object = counter();
        let schema = transform_with(|_, rt| rt.object_field("count")).with_object_context(object);
        assert_eq!(schema.call(Value::Null).unwrap().value(), Some(&Value::Int(0)));
    }

    #[test]
    fn test_unknown_field() {
        let schema = transform_with(|_, rt| rt.object_field("missing"))
            .with_object_context(counter());
        assert!(matches!(
            schema.call(Value::Null),
            Err(SchemaError::ObjectFieldMissing { .. })
        ));
    }
}
