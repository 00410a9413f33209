//! AROUND combinator - user code wrapped around a caster
//!
//! `cast_around(run).around(inner)` hands the input, the wrapped caster and
//! the runtime to `run`. The callback decides whether, when and on what value
//! `inner` runs, and may adjust the value or the result around the call.
//! The wrapped caster must be attached before evaluation, and only once.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let trimmed = Schema::from(
//!     cast_around(|input, inner, rt| {
//!         let text = input.as_str().map(str::trim).map(Value::from).unwrap_or(input);
//!         inner.cast(text, rt)
//!     })
//!     .around(non_empty_string())?,
//! );
//! ```

use std::fmt;

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::Value;

type AroundFn = dyn Fn(Value, &Schema, &mut Runtime) -> Result<CastResult, SchemaError> + Send + Sync;

/// Caster running a callback around a wrapped caster; see the module docs.
pub struct Around {
    run: Box<AroundFn>,
    inner: Option<Schema>,
}

impl Around {
    /// Attaches the wrapped caster.
    ///
    /// Fails with [`SchemaError::DuplicateAround`] if one is already attached.
    pub fn around(mut self, inner: impl Into<Schema>) -> Result<Self, SchemaError> {
        if self.inner.is_some() {
            return Err(SchemaError::DuplicateAround);
        }
        self.inner = Some(inner.into());
        Ok(self)
    }
}

impl Cast for Around {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let inner = self.inner.as_ref().ok_or(SchemaError::MissingAround)?;
        (self.run)(input, inner, rt)
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.inner
            .as_ref()
            .ok_or(SchemaError::MissingAround)?
            .json_schema()
    }
}

impl fmt::Debug for Around {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Around")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

pub fn cast_around(
    run: impl Fn(Value, &Schema, &mut Runtime) -> Result<CastResult, SchemaError>
    + Send
    + Sync
    + 'static,
) -> Around {
    Around {
        run: Box::new(run),
        inner: None,
    }
}
