//! Context nodes
//!
//! Each node pushes a frame onto the [`Runtime`](crate::runtime::Runtime)
//! while its subtree runs:
//!
//! - [`StructureCleaner`]: checked-key tracking and cleanup
//! - [`UserContext`]: read-only variables
//! - [`I18nNode`] / [`I18nMapKeys`]: localization of failures
//! - [`ObjectContext`]: fields of a bound host object
//!
//! [`MapErrors`] pushes no frame; it only post-processes failures.

mod cleaner;
mod errors;
mod i18n;
mod object;
mod user;

pub use cleaner::{CleanPolicy, StructureCleaner, choosy_schema, partial_schema, schema};
pub use errors::MapErrors;
pub use i18n::{I18nMapKeys, I18nNode};
pub use object::{BoundObject, ObjectContext};
pub use user::UserContext;
