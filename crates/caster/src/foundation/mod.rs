//! Core casting types and traits
//!
//! This module contains the fundamental building blocks of the casting system:
//!
//! - **Traits**: [`Cast`], and the [`Schema`] handle every builder returns
//! - **Results**: [`CastResult`], valid value or error tree
//! - **Errors**: [`ErrorTree`] for validation failures, [`SchemaError`] for
//!   schema misuse
//!
//! # Architecture
//!
//! ## 1. Dynamic values
//!
//! Casters take and produce [`Value`](crate::value::Value)s. A caster may
//! validate (return its input unchanged), transform (return something else)
//! or both.
//!
//! ## 2. Composition
//!
//! Casters compose with operators on [`Schema`]:
//!
//! ```rust,ignore
//! let age = integer() & check(|v| v.as_i64().is_some_and(|n| n >= 18));
//! let id = integer() | to_integer();
//! let person = hash_schema([("name", string())]) * hash_schema([("age", age)]);
//! ```
//!
//! ## 3. Failures are values
//!
//! A failed cast returns `Ok(CastResult::Invalid(tree))`. `Err(SchemaError)`
//! is reserved for programming mistakes and aborts the evaluation.

pub mod error;
pub mod result;
pub mod traits;
pub mod tree;

pub use error::{BoxError, SchemaError};
pub use result::CastResult;
pub use traits::{Cast, Schema};
pub use tree::{ErrorItem, ErrorKey, ErrorTree, merge_errors};
