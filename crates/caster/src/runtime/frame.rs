//! Context frames and the capabilities they provide.
//!
//! A frame is pushed onto the [`Runtime`](super::Runtime) for the duration of
//! a subtree's evaluation. Each frame exposes zero or more capabilities by
//! overriding the matching `as_*` accessor; a capability request walks the
//! frames from the innermost outward and uses the first one that answers.

use std::any::Any;
use std::fmt;

use crate::runtime::{CheckedSchema, PathKey};
use crate::value::Value;

/// A scoped piece of per-call state.
pub trait ContextFrame: Any + fmt::Debug + Send {
    fn as_key_tracker(&mut self) -> Option<&mut dyn KeyTracker> {
        None
    }

    fn as_variable_bag(&self) -> Option<&dyn VariableBag> {
        None
    }

    fn as_i18n_args(&mut self) -> Option<&mut dyn I18nArgs> {
        None
    }

    fn as_object_state(&mut self) -> Option<&mut dyn ObjectState> {
        None
    }
}

/// Records which keys of the value under evaluation were checked.
pub trait KeyTracker {
    /// Descends into `key`.
    fn enter_key(&mut self, key: PathKey);

    /// Returns from the key entered last, recording it as checked.
    fn leave_key(&mut self);

    /// Declares that the current level tracks its children individually.
    fn will_check(&mut self);

    /// Merges a record built by a nested tracker into the current level.
    fn merge_checked(&mut self, record: CheckedSchema);

    /// Switches recording off or on, returning the previous setting.
    fn set_ignoring(&mut self, ignoring: bool) -> bool;
}

/// Read-only user-supplied variables.
pub trait VariableBag {
    fn variable(&self, name: &str) -> Option<&Value>;
}

/// Arguments collected for the localized message of a failure.
pub trait I18nArgs {
    fn set_arg(&mut self, name: String, value: Value);
}

/// Fields of an object bound to the evaluation.
pub trait ObjectState {
    fn field(&self, name: &str) -> Option<&Value>;

    /// Updates a bound field. Returns false if the field is not bound.
    fn set_field(&mut self, name: &str, value: Value) -> bool;
}
