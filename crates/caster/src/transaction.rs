//! Transactions: casters bound to a host object.
//!
//! A [`Transaction`] owns a [`BoundObject`] and builds schemas that run with
//! its fields in scope. Two shapes are supported:
//!
//! - [`Transaction::perform`] (and the `_partial` / `_choosy` variants) wraps
//!   one caster in a structure cleaner;
//! - [`Transaction::steps`] runs a procedure that calls casters one step at a
//!   time. [`Steps::require`] stops the whole transaction on the first failed
//!   step, returning that failure as the transaction result.
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let tx = Transaction::new(fields);
//! let order = tx.steps(|input, steps| {
//!     let id = steps.require(&to_integer(), input.get("id").cloned().unwrap_or_default())?;
//!     steps.runtime().set_object_field("last_id", id.clone())?;
//!     Ok(CastResult::valid(id))
//! });
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::{BoundObject, CleanPolicy, StructureCleaner};
use crate::foundation::{Cast, CastResult, ErrorTree, Schema, SchemaError};
use crate::runtime::Runtime;
use crate::value::Value;

// ============================================================================
// HALT
// ============================================================================

/// Early exit from a [`Transaction::steps`] procedure.
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    /// A required step failed; its errors become the transaction result.
    #[error("transaction step failed")]
    Failed(ErrorTree),

    /// The schema was misused; the evaluation aborts.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ============================================================================
// STEPS
// ============================================================================

/// Handle passed to a step procedure.
pub struct Steps<'rt> {
    rt: &'rt mut Runtime,
}

impl Steps<'_> {
    /// Runs `caster` on `input` in the transaction's runtime.
    pub fn step(&mut self, caster: &Schema, input: impl Into<Value>) -> Result<CastResult, SchemaError> {
        caster.cast(input.into(), self.rt)
    }

    /// Runs a step and returns its value, halting the transaction if it fails.
    pub fn require(&mut self, caster: &Schema, input: impl Into<Value>) -> Result<Value, Halt> {
        match self.step(caster, input)? {
            CastResult::Valid(value) => Ok(value),
            CastResult::Invalid(errors) => Err(Halt::Failed(errors)),
        }
    }

    /// The runtime of the transaction, for object fields and context reads.
    pub fn runtime(&mut self) -> &mut Runtime {
        self.rt
    }
}

type StepsFn = dyn Fn(Value, &mut Steps<'_>) -> Result<CastResult, Halt> + Send + Sync;

struct StepsNode {
    body: Box<StepsFn>,
}

impl Cast for StepsNode {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match (self.body)(input, &mut Steps { rt }) {
            Ok(result) => Ok(result),
            Err(Halt::Failed(errors)) => {
                tracing::trace!("transaction halted by a failed step");
                Ok(CastResult::invalid(errors))
            }
            Err(Halt::Schema(err)) => Err(err),
        }
    }
}

impl fmt::Debug for StepsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepsNode").finish_non_exhaustive()
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Builds schemas bound to one host object.
#[derive(Clone)]
pub struct Transaction {
    object: Arc<Mutex<dyn BoundObject>>,
}

impl Transaction {
    pub fn new(object: impl BoundObject + 'static) -> Self {
        Self {
            object: Arc::new(Mutex::new(object)),
        }
    }

    /// Uses an object that is also held elsewhere.
    pub fn shared(object: Arc<Mutex<dyn BoundObject>>) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &Arc<Mutex<dyn BoundObject>> {
        &self.object
    }

    /// Runs `base` under a cleaner that rejects unchecked keys.
    pub fn perform(&self, base: impl Into<Schema>) -> Schema {
        self.bind(base.into(), CleanPolicy::Fail)
    }

    /// Runs `base` under a cleaner that keeps unchecked keys.
    pub fn perform_partial(&self, base: impl Into<Schema>) -> Schema {
        self.bind(base.into(), CleanPolicy::Pass)
    }

    /// Runs `base` under a cleaner that drops unchecked keys.
    pub fn perform_choosy(&self, base: impl Into<Schema>) -> Schema {
        self.bind(base.into(), CleanPolicy::Strip)
    }

    /// Runs a step procedure; no structure cleaning is applied.
    pub fn steps(
        &self,
        body: impl Fn(Value, &mut Steps<'_>) -> Result<CastResult, Halt> + Send + Sync + 'static,
    ) -> Schema {
        Schema::new(StepsNode {
            body: Box::new(body),
        })
        .with_object_context(Arc::clone(&self.object))
    }

    fn bind(&self, base: Schema, policy: CleanPolicy) -> Schema {
        Schema::new(StructureCleaner::new(base, policy)).with_object_context(Arc::clone(&self.object))
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casters::{hash_schema, integer, run, string, to_integer};
    use crate::value::Hash;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Hash {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn field(tx: &Transaction, name: &str) -> Option<Value> {
        tx.object().lock().fields().get(name).cloned()
    }

    fn counting() -> Schema {
        let count = run(|_, rt| {
            let calls = rt.object_field("calls")?.as_i64().unwrap_or_default();
            rt.set_object_field("calls", calls + 1)
        });
        hash_schema([("a", integer())]) & count
    }

    #[test]
    fn test_perform_variants_clean_and_bind() {
        let tx = Transaction::new(fields(&[("calls", Value::Int(0))]));
        let input = Value::from(json!({"a": 1, "b": 2}));

        let strict = tx.perform(counting()).call(input.clone()).unwrap();
        assert!(strict.raw_errors().unwrap().get("b").is_some());

        let choosy = tx.perform_choosy(counting()).call(input.clone()).unwrap();
        assert_eq!(choosy.value(), Some(&Value::from(json!({"a": 1}))));

        let partial = tx.perform_partial(counting()).call(input.clone()).unwrap();
        assert_eq!(partial.value(), Some(&input));

        assert_eq!(field(&tx, "calls"), Some(Value::Int(3)));
    }

    fn order(tx: &Transaction) -> Schema {
        tx.steps(|input, steps| {
            let id = steps.require(&to_integer(), input.get("id").cloned().unwrap_or(Value::Absent))?;
            steps.runtime().set_object_field("last_id", id.clone())?;
            let name = steps.step(&string(), input.get("name").cloned().unwrap_or(Value::Absent))?;
            Ok(name.map(|name| Value::from(vec![id, name])))
        })
    }

    #[test]
    fn test_steps_run_in_order() {
        let tx = Transaction::new(fields(&[("last_id", Value::Null)]));
        let result = order(&tx)
            .call(Value::from(json!({"id": "7", "name": "tea"})))
            .unwrap();
        assert_eq!(result.value(), Some(&Value::from(json!([7, "tea"]))));
        assert_eq!(field(&tx, "last_id"), Some(Value::Int(7)));
    }

    #[test]
    fn test_failed_required_step_halts() {
        let tx = Transaction::new(fields(&[("last_id", Value::Null)]));
        let result = order(&tx).call(Value::from(json!({"id": "x"}))).unwrap();
        assert_eq!(
            result.raw_errors().unwrap().items().unwrap()[0].to_string(),
            ".to_integer"
        );
        assert_eq!(field(&tx, "last_id"), Some(Value::Null));
    }

    #[test]
    fn test_schema_errors_propagate_from_steps() {
        let tx = Transaction::new(Hash::new());
        let result = order(&tx).call(Value::from(json!({"id": 1})));
        assert!(matches!(result, Err(SchemaError::ObjectFieldMissing { .. })));
    }
}
