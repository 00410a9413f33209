//! Core caster trait and the shared schema handle.

use std::fmt;
use std::ops::{BitAnd, BitOr, Mul};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::combinators::{Aggregate, And, Or, Then};
use crate::context::{
    BoundObject, I18nMapKeys, I18nNode, MapErrors, ObjectContext, UserContext,
};
use crate::foundation::{CastResult, ErrorTree, SchemaError};
use crate::i18n::{Args, I18nValue};
use crate::json_schema::{JsonSchema, JsonSchemaAttrs};
use crate::runtime::Runtime;
use crate::value::Value;

// ============================================================================
// CAST TRAIT
// ============================================================================

/// A composable unit mapping a value to a [`CastResult`].
///
/// Implementations are immutable once built. All per-call state lives in the
/// [`Runtime`] that is threaded through the evaluation.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_caster::prelude::*;
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Cast for Even {
///     fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
///         match input.as_i64() {
///             Some(n) if n % 2 == 0 => Ok(CastResult::valid(input)),
///             _ => Ok(CastResult::invalid("must be even")),
///         }
///     }
/// }
///
/// let even = Schema::new(Even);
/// assert!(even.call(4)?.is_valid());
/// ```
pub trait Cast: fmt::Debug + Send + Sync {
    /// Evaluates the caster against `input`.
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError>;

    /// Describes the accepted shape as a JSON-schema fragment.
    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::new())
    }

    /// True for casters that accept an absent value (`optional(...)`).
    fn is_optional(&self) -> bool {
        false
    }
}

// ============================================================================
// SCHEMA HANDLE
// ============================================================================

/// Shared, cheaply clonable handle to a caster tree.
///
/// The same sub-schema may be referenced by several parents. Builder methods
/// consume `self` and return a new handle wrapping the old one.
#[derive(Clone)]
pub struct Schema(Arc<dyn Cast>);

impl Schema {
    pub fn new(caster: impl Cast + 'static) -> Self {
        Self(Arc::new(caster))
    }

    /// Evaluates the schema on `input` with a fresh runtime.
    pub fn call(&self, input: impl Into<Value>) -> Result<CastResult, SchemaError> {
        let mut rt = Runtime::new();
        self.cast(input.into(), &mut rt)
    }

    /// Evaluates the schema inside an existing runtime.
    pub fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        self.0.cast(input, rt)
    }

    pub fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.0.json_schema()
    }

    pub fn is_optional(&self) -> bool {
        self.0.is_optional()
    }

    // ===== Combinators =====

    /// Sequential AND: feeds the value of `self` into `other`.
    pub fn and(self, other: impl Into<Schema>) -> Schema {
        Schema::new(And::new(self, other.into()))
    }

    /// OR: tries `other` on the original input when `self` fails.
    pub fn or(self, other: impl Into<Schema>) -> Schema {
        Schema::new(Or::new(self, other.into()))
    }

    /// AND that also evaluates `other` on failure and merges both error trees.
    pub fn aggregate(self, other: impl Into<Schema>) -> Schema {
        Schema::new(Aggregate::new(self, other.into()))
    }

    /// Conditional: on success feeds into `then`, on failure into the else
    /// branch attached with [`Then::otherwise`].
    pub fn then(self, then: impl Into<Schema>) -> Then {
        Then::new(self, then.into())
    }

    // ===== Context =====

    /// Makes `vars` readable through [`Runtime::context_var`].
    pub fn with_context(self, vars: IndexMap<String, Value>) -> Schema {
        Schema::new(UserContext::new(self, vars))
    }

    /// Binds the fields of `object` for the duration of each call.
    pub fn with_object_context(self, object: Arc<Mutex<dyn BoundObject>>) -> Schema {
        Schema::new(ObjectContext::new(self, object))
    }

    /// Rewrites the error tree of a failed result.
    pub fn map_errors(
        self,
        f: impl Fn(ErrorTree) -> ErrorTree + Send + Sync + 'static,
    ) -> Schema {
        Schema::new(MapErrors::new(self, f))
    }

    // ===== Localization =====

    /// Replaces the error keys of a failure.
    pub fn i18n_key<I, S>(self, keys: I, args: Args) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::new(I18nNode::new(self, I18nValue::key(keys).with_args(args)))
    }

    /// Prefixes relative error keys of a failure with `scope`.
    pub fn i18n_scope(self, scope: impl Into<String>, args: Args) -> Schema {
        Schema::new(I18nNode::new(self, I18nValue::scope(scope).with_args(args)))
    }

    /// Adds arguments to the error keys of a failure.
    pub fn i18n_vars(self, args: Args) -> Schema {
        Schema::new(I18nNode::new(self, I18nValue::vars(args)))
    }

    /// Legacy form of [`Schema::i18n_key`].
    pub fn i18n_default_keys<I, S>(self, keys: I, args: Args) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::new(I18nNode::new(
            self,
            I18nValue::default_keys(keys).with_args(args),
        ))
    }

    /// Renames error keys of a single-key failure.
    pub fn i18n_map_keys(self, mapping: IndexMap<String, String>) -> Schema {
        Schema::new(I18nMapKeys::new(self, mapping))
    }

    // ===== JSON schema =====

    /// Overrides fields of the exported JSON schema.
    pub fn json_schema_attrs(self, attrs: JsonSchema) -> Schema {
        Schema::new(JsonSchemaAttrs::new(self, attrs))
    }

    /// Sets the `description` of the exported JSON schema.
    pub fn json_schema_description(self, description: impl Into<String>) -> Schema {
        let attrs = JsonSchema::new().with("description", description.into());
        self.json_schema_attrs(attrs)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<C: Cast + 'static> From<C> for Schema {
    fn from(caster: C) -> Self {
        Self::new(caster)
    }
}

impl<R: Into<Schema>> BitAnd<R> for Schema {
    type Output = Schema;

    fn bitand(self, rhs: R) -> Schema {
        self.and(rhs)
    }
}

impl<R: Into<Schema>> BitOr<R> for Schema {
    type Output = Schema;

    fn bitor(self, rhs: R) -> Schema {
        self.or(rhs)
    }
}

impl<R: Into<Schema>> Mul<R> for Schema {
    type Output = Schema;

    fn mul(self, rhs: R) -> Schema {
        self.aggregate(rhs)
    }
}

// ============================================================================
// TESTS
// ============================================================================
