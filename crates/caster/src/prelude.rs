//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let point = hash_schema([("x", to_integer()), ("y", to_integer())]);
//! ```

// ============================================================================
// FOUNDATION: core trait, results, errors
// ============================================================================

pub use crate::foundation::{
    BoxError, Cast, CastResult, ErrorItem, ErrorKey, ErrorTree, Schema, SchemaError,
    merge_errors,
};
pub use crate::runtime::{PathKey, Runtime};
pub use crate::value::{Hash, Kind, Value};

// ============================================================================
// CASTERS
// ============================================================================

#[allow(clippy::wildcard_imports, ambiguous_glob_reexports)]
pub use crate::casters::*;

// ============================================================================
// COMBINATORS AND CONTEXT NODES
// ============================================================================

pub use crate::combinators::{
    cast_around, lazy, pass_if, switch, switch_by, switch_on, switch_on_path,
};
pub use crate::context::{BoundObject, CleanPolicy, choosy_schema, partial_schema, schema};
pub use crate::transaction::{Halt, Steps, Transaction};

// ============================================================================
// LOCALIZATION AND EXPORT
// ============================================================================

pub use crate::i18n::{Args, Catalog, I18nValue, Localizer};
pub use crate::json_schema::JsonSchema;
