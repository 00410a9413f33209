//! Localization of error messages
//!
//! Casters report failures as [`I18nValue::Key`]s with candidate keys such as
//! `[".string", "datacaster.errors.string"]`. Relative keys (leading dot) get
//! a prefix from enclosing `i18n_scope` nodes; absolute keys are used as is.
//! A [`Localizer`] turns the final key into a message.

mod localizer;
mod value;

pub use localizer::{Catalog, CatalogError, Localizer};
pub use value::{Args, ComposeError, I18nValue, Keys};

/// Builds the standard error value for a caster named `name`:
/// `Key([".name", "datacaster.errors.name"])`.
pub fn error_key(name: &str) -> I18nValue {
    I18nValue::key([format!(".{name}"), format!("datacaster.errors.{name}")])
}
