//! Primitive casters built from closures.
//!
//! | Caster          | Closure                                     | Fails with    |
//! |-----------------|---------------------------------------------|---------------|
//! | [`check`]       | `Fn(&Value) -> bool`                        | `check`       |
//! | [`transform`]   | `Fn(Value) -> Value`                        | never         |
//! | [`cast`]        | `Fn(Value, &mut Runtime) -> Result<CastResult, _>` | whatever it returns |
//! | [`compare`]     | equality with a reference value             | `compare`     |
//! | [`try_transform`] | `Fn(Value) -> Result<Value, BoxError>`    | `try` for caught errors |
//! | [`run`]         | side effect only, input passes through      | never         |

use std::error::Error;
use std::fmt;

use crate::foundation::{BoxError, Cast, CastResult, Schema, SchemaError};
use crate::i18n::error_key;
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

type CheckFn = dyn Fn(&Value, &mut Runtime) -> Result<bool, SchemaError> + Send + Sync;
type TransformFn = dyn Fn(Value, &mut Runtime) -> Result<Value, SchemaError> + Send + Sync;
type CastFn = dyn Fn(Value, &mut Runtime) -> Result<CastResult, SchemaError> + Send + Sync;
type RunFn = dyn Fn(&Value, &mut Runtime) -> Result<(), SchemaError> + Send + Sync;
type TryFn = dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync;
type CatchFn = dyn Fn(&(dyn Error + Send + Sync + 'static)) -> bool + Send + Sync;

// ============================================================================
// CHECKER
// ============================================================================

/// Passes the input through when the predicate holds.
pub struct Checker {
    check: Box<CheckFn>,
}

impl Cast for Checker {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if (self.check)(&input, rt)? {
            Ok(CastResult::valid(input))
        } else {
            Ok(CastResult::invalid(error_key("check").with_arg("value", input)))
        }
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker").finish_non_exhaustive()
    }
}

/// Creates a caster that fails when `check` returns false.
pub fn check(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Schema {
    check_with(move |value, _| Ok(check(value)))
}

/// Like [`check`], with access to the runtime.
pub fn check_with(
    check: impl Fn(&Value, &mut Runtime) -> Result<bool, SchemaError> + Send + Sync + 'static,
) -> Schema {
    Schema::new(Checker {
        check: Box::new(check),
    })
}

// ============================================================================
// TRANSFORMER
// ============================================================================

/// Replaces the input with the closure's output. Never fails.
pub struct Transformer {
    transform: Box<TransformFn>,
}

impl Cast for Transformer {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        (self.transform)(input, rt).map(CastResult::valid)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

pub fn transform(transform: impl Fn(Value) -> Value + Send + Sync + 'static) -> Schema {
    transform_with(move |value, _| Ok(transform(value)))
}

/// Like [`transform`], with access to the runtime.
pub fn transform_with(
    transform: impl Fn(Value, &mut Runtime) -> Result<Value, SchemaError> + Send + Sync + 'static,
) -> Schema {
    Schema::new(Transformer {
        transform: Box::new(transform),
    })
}

// ============================================================================
// CASTER
// ============================================================================

/// Fully custom caster: the closure builds the result itself.
pub struct Caster {
    cast: Box<CastFn>,
}

impl Cast for Caster {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        (self.cast)(input, rt)
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caster").finish_non_exhaustive()
    }
}

pub fn cast(
    cast: impl Fn(Value, &mut Runtime) -> Result<CastResult, SchemaError> + Send + Sync + 'static,
) -> Schema {
    Schema::new(Caster {
        cast: Box::new(cast),
    })
}

// ============================================================================
// COMPARATOR
// ============================================================================

/// Passes only values equal to a reference.
#[derive(Debug, Clone)]
pub struct Comparator {
    reference: Value,
}

impl Cast for Comparator {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if input == self.reference {
            Ok(CastResult::valid(input))
        } else {
            Ok(CastResult::invalid(
                error_key("compare")
                    .with_arg("reference", self.reference.to_string())
                    .with_arg("value", input),
            ))
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::new().with("const", self.reference.to_json()))
    }
}

pub fn compare(reference: impl Into<Value>) -> Schema {
    Schema::new(Comparator {
        reference: reference.into(),
    })
}

// ============================================================================
// TRIER
// ============================================================================

/// Fallible transform converting selected errors into failures.
///
/// Errors accepted by one of the catchers become a `try` failure; any other
/// error aborts the evaluation with [`SchemaError::Uncaught`]. Without
/// catchers nothing is caught.
///
/// ```rust,ignore
/// let port = Schema::from(
///     try_transform(|v| Ok(Value::Int(v.to_string().parse::<u16>()?.into())))
///         .catching::<std::num::ParseIntError>(),
/// );
/// ```
pub struct Trier {
    transform: Box<TryFn>,
    catchers: Vec<Box<CatchFn>>,
}

fn is_error<E: Error + 'static>(err: &(dyn Error + Send + Sync + 'static)) -> bool {
    err.is::<E>()
}

impl Trier {
    /// Catches errors of type `E`.
    #[must_use = "builder methods must be chained or built"]
    pub fn catching<E: Error + 'static>(mut self) -> Self {
        self.catchers.push(Box::new(is_error::<E>));
        self
    }

    /// Catches errors accepted by `predicate`.
    #[must_use = "builder methods must be chained or built"]
    pub fn catching_if(
        mut self,
        predicate: impl Fn(&(dyn Error + Send + Sync + 'static)) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.catchers.push(Box::new(predicate));
        self
    }

    /// Catches every error.
    #[must_use = "builder methods must be chained or built"]
    pub fn catching_all(self) -> Self {
        self.catching_if(|_| true)
    }
}

impl Cast for Trier {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match (self.transform)(input.clone()) {
            Ok(value) => Ok(CastResult::valid(value)),
            Err(err) if self.catchers.iter().any(|catches| catches(err.as_ref())) => {
                tracing::trace!(error = %err, "transform error caught");
                Ok(CastResult::invalid(error_key("try").with_arg("value", input)))
            }
            Err(err) => Err(SchemaError::Uncaught { source: err }),
        }
    }
}

impl fmt::Debug for Trier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trier")
            .field("catchers", &self.catchers.len())
            .finish_non_exhaustive()
    }
}

pub fn try_transform(
    transform: impl Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
) -> Trier {
    Trier {
        transform: Box::new(transform),
        catchers: Vec::new(),
    }
}

// ============================================================================
// RUNNER
// ============================================================================

/// Runs a side effect; the input passes through unchanged.
pub struct Runner {
    run: Box<RunFn>,
}

impl Cast for Runner {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        (self.run)(&input, rt)?;
        Ok(CastResult::valid(input))
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

pub fn run(
    run: impl Fn(&Value, &mut Runtime) -> Result<(), SchemaError> + Send + Sync + 'static,
) -> Schema {
    Schema::new(Runner { run: Box::new(run) })
}

// ============================================================================
// TESTS
// ============================================================================
