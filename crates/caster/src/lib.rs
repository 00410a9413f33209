//! # nebula-caster
//!
//! Composable casting and validation of dynamically typed data.
//!
//! A caster takes a [`Value`] and returns a [`CastResult`]: either a valid,
//! possibly transformed value, or a tree of errors keyed by the path where
//! they happened. Casters compose with operators and builders into a
//! [`Schema`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let user = schema(hash_schema([
//!     ("name", non_empty_string()),
//!     ("age", optional(to_integer() & check(|v| v.as_i64() >= Some(18)))),
//!     ("role", included_in(["admin", "user"]) | transform_to_value("user")),
//! ]));
//!
//! let result = user.call(json!({"name": "ann", "age": "21", "role": "guest"}))?;
//! assert_eq!(result.into_value()?, json!({"name": "ann", "age": 21, "role": "user"}).into());
//! ```
//!
//! ## Composition
//!
//! - `a & b`: run `a`, feed its value into `b`
//! - `a | b`: run `b` on the original input if `a` fails
//! - `a * b`: like `&`, but collect the errors of both
//! - `a.then(b).otherwise(c)`: branch on the outcome of `a`
//! - [`switch_on`](combinators::switch_on): pick a branch by the value of a key
//!
//! ## Structure cleaning
//!
//! [`schema`](context::schema), [`choosy_schema`](context::choosy_schema) and
//! [`partial_schema`](context::partial_schema) decide what happens to hash
//! keys no caster looked at: reject, drop, or keep them.
//! [`Transaction`](transaction::Transaction) adds a bound host object and a
//! step-by-step form.
//!
//! ## Errors
//!
//! Failures carry localization keys such as `.integer` /
//! `datacaster.errors.integer`. [`CastResult::errors`] resolves them with the
//! localizer from [`config`]. Misuse of the API (an unterminated `then`, a
//! context variable read outside `with_context`) is a [`SchemaError`].

// Schema errors carry owned strings for diagnostics; boxing them would add an
// allocation to every fallible call.
#![allow(clippy::result_large_err)]

pub mod casters;
pub mod combinators;
pub mod config;
pub mod context;
pub mod foundation;
pub mod i18n;
pub mod json_schema;
pub mod prelude;
pub mod registry;
pub mod runtime;
pub mod transaction;
pub mod value;

pub use foundation::{BoxError, Cast, CastResult, ErrorItem, ErrorKey, ErrorTree, Schema, SchemaError};
pub use value::{Kind, Value};
