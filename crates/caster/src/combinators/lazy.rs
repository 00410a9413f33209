//! LAZY combinator - deferred schema construction

use std::fmt;
use std::sync::OnceLock;

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::runtime::Runtime;
use crate::value::Value;

// ============================================================================
// LAZY COMBINATOR
// ============================================================================

/// Defers schema creation until first use.
///
/// Useful for recursive schemas, where a schema refers to itself:
///
/// ```rust,ignore
/// use nebula_caster::prelude::*;
///
/// fn tree() -> Schema {
///     hash_schema([
///         ("value", integer()),
///         ("children", optional(array_schema(lazy(tree)))),
///     ])
/// }
/// ```
///
/// Recursion is bounded by the depth of the input: each level builds the next
/// schema only when it is reached.
pub struct Lazy {
    init: Box<dyn Fn() -> Schema + Send + Sync>,
    schema: OnceLock<Schema>,
}

impl Lazy {
    /// Creates a new LAZY combinator.
    ///
    /// The `init` function is called once on first cast.
    pub fn new(init: impl Fn() -> Schema + Send + Sync + 'static) -> Self {
        Self {
            init: Box::new(init),
            schema: OnceLock::new(),
        }
    }

    /// Returns true if the schema has been built.
    pub fn is_initialized(&self) -> bool {
        self.schema.get().is_some()
    }

    /// Forces initialization and returns the schema.
    pub fn force(&self) -> &Schema {
        self.schema.get_or_init(&self.init)
    }
}

impl Cast for Lazy {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        self.force().cast(input, rt)
    }

    fn is_optional(&self) -> bool {
        self.force().is_optional()
    }
}

// Manual Debug impl: the inner schema may be recursive
impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Creates a LAZY combinator.
pub fn lazy(init: impl Fn() -> Schema + Send + Sync + 'static) -> Schema {
    Schema::new(Lazy::new(init))
}

// ============================================================================
// TESTS
// ============================================================================
