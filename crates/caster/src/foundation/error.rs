//! Schema misuse errors
//!
//! Validation failures are data: they travel inside
//! [`CastResult::Invalid`](crate::foundation::CastResult). A [`SchemaError`]
//! is different: it signals a programming mistake in how a schema was built
//! or used (a `then` without an `else`, a context variable read outside
//! `with_context`, a transform raising an error nobody asked to catch).
//! Combinators never turn a `SchemaError` into a failure; it aborts the
//! whole evaluation.

use crate::i18n::ComposeError;

/// Boxed error returned by fallible user transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// SCHEMA ERROR TYPE
// ============================================================================

/// Error raised when a schema is built or evaluated incorrectly.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A `then` node was evaluated before `.otherwise(...)` was attached.
    #[error("then-node has no else branch, call `.otherwise(...)` before evaluating it")]
    MissingElse,

    /// `.otherwise(...)` was called twice on the same node.
    #[error("else branch is already attached")]
    DuplicateElse,

    /// An around node was evaluated before `.around(...)` was attached.
    #[error("around-node wraps nothing, call `.around(...)` before evaluating it")]
    MissingAround,

    /// `.around(...)` was called twice on the same node.
    #[error("around-node already wraps a caster")]
    DuplicateAround,

    /// A switch was evaluated without any `.on(...)` clause.
    #[error("switch has no branches, add at least one `.on(...)` clause")]
    EmptySwitch,

    /// No frame in the context chain provides the requested capability.
    #[error("`{capability}` is not available here, wrap the caster in the matching context node")]
    CapabilityMissing { capability: &'static str },

    /// A user context variable was requested but never supplied.
    #[error("context variable `{key}` is not defined")]
    ContextKeyMissing { key: String },

    /// An object-bound field was requested but the object does not expose it.
    #[error("object field `{field}` is not bound")]
    ObjectFieldMissing { field: String },

    /// A result was rebuilt from a result of the other kind.
    #[error("expected a {expected} result, got an {actual} one")]
    ResultMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The value of an invalid result was requested.
    #[error("cannot take the value of an invalid result: {errors}")]
    UnwrapInvalid { errors: String },

    /// Two localization values could not be composed.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// A transform raised an error that is not in its catch list.
    #[error("uncaught error in transform: {source}")]
    Uncaught {
        #[source]
        source: BoxError,
    },

    /// The structure cleaner met a scalar where its record expects children.
    #[error("checked-key record expects a hash or an array, got {kind}")]
    CleanerShape { kind: &'static str },

    /// `transform_to_hash` with several output keys got a mismatching value.
    #[error("expected {expected} values for keys {keys:?}, got {actual}")]
    MappingArity {
        keys: Vec<String>,
        expected: usize,
        actual: usize,
    },

    /// No caster is registered under this name.
    #[error("caster `{name}` is not registered")]
    UnknownCaster { name: String },

    /// A caster is already registered under this name.
    #[error("caster `{name}` is already registered")]
    DuplicateCaster { name: String },

    /// Two JSON-schema descriptors disagree on a field.
    #[error("json schema conflict on `{field}`: {left} vs {right}")]
    JsonSchemaConflict {
        field: String,
        left: String,
        right: String,
    },

    /// A localization key has no absolute candidate to fall back to.
    #[error("cannot resolve error message, no absolute key among {candidates:?}")]
    Unresolvable { candidates: Vec<String> },

    /// The frame popped from the runtime is not the one that was pushed.
    #[error("context chain is unbalanced")]
    FrameMismatch,

    /// The global caster registry was used before `registry::init()`.
    #[error("caster registry is not initialized")]
    RegistryNotInitialized,
}

impl SchemaError {
    /// Creates a capability error.
    pub fn capability(capability: &'static str) -> Self {
        Self::CapabilityMissing { capability }
    }

    /// Wraps an error raised by a user transform.
    pub fn uncaught(source: impl Into<BoxError>) -> Self {
        Self::Uncaught {
            source: source.into(),
        }
    }

    /// Returns true for errors caused by a missing context wrapper.
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            Self::CapabilityMissing { .. }
                | Self::ContextKeyMissing { .. }
                | Self::ObjectFieldMissing { .. }
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
