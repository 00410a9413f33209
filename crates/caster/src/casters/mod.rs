//! Leaf casters
//!
//! - [`primitive`]: casters built from closures (`check`, `transform`, `cast`,
//!   `compare`, `try_transform`, `run`)
//! - [`structure`]: `hash_schema`, `array_schema`, `transform_to_hash`
//! - [`predefined`]: type checks, conversions and value helpers
//! - [`merger`]: `merge_message_keys`
//! - [`rules`]: adapter for external rule sets

pub mod merger;
pub mod predefined;
pub mod primitive;
pub mod rules;
pub mod structure;

pub use predefined::{
    Iso8601, IncludedIn, Matches, MustBe, Optional, Pick, TypeCheck, absent, any, array, boolean,
    check_named, context_value, decimal, default, float, hash_value, included_in, integer, integer32,
    iso8601, matches, must_be, non_empty_string, optional, optional_param, pass, pick, pick_all,
    pick_path, remove, string, to_boolean, to_float, to_integer, transform_if_present,
    transform_to_value,
};
pub use merger::{MessageKeysMerger, merge_message_keys};
pub use primitive::{
    Caster, Checker, Comparator, Runner, Transformer, Trier, cast, check, check_with, compare,
    run, transform, transform_with, try_transform,
};
pub use rules::{RuleSet, Validate, validate};
pub use structure::{
    ArraySchema, HashMapper, HashSchema, MappedKeys, array_schema, hash_schema, transform_to_hash,
};
