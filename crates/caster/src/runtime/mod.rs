//! Per-call context chain
//!
//! A [`Runtime`] is created for every top-level call and threaded through
//! every caster. Context nodes push a [`ContextFrame`] for the duration of
//! their subtree with [`Runtime::with_frame`]; capability lookups walk the
//! frames from the innermost outward.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let at_least = check_with(|value, rt| {
//!     let min = rt.context_var("min")?;
//!     Ok(value.as_i64() >= min.as_i64())
//! });
//! let schema = at_least.with_context(indexmap! { "min".into() => Value::Int(3) });
//! assert!(schema.call(5)?.is_valid());
//! ```

pub mod frame;
pub mod tracker;

pub use frame::{ContextFrame, I18nArgs, KeyTracker, ObjectState, VariableBag};
pub use tracker::{CheckedSchema, PathKey, StructureTracker};

use std::any::Any;

use crate::foundation::SchemaError;
use crate::value::Value;

// ============================================================================
// RUNTIME
// ============================================================================

/// Stack of context frames for one evaluation.
#[derive(Debug, Default)]
pub struct Runtime {
    frames: Vec<Box<dyn ContextFrame>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames currently pushed.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pushes `frame`, runs `body`, pops the frame and hands it back.
    pub fn with_frame<F, R>(
        &mut self,
        frame: F,
        body: impl FnOnce(&mut Self) -> R,
    ) -> Result<(F, R), SchemaError>
    where
        F: ContextFrame,
    {
        let depth = self.frames.len();
        self.frames.push(Box::new(frame));
        let output = body(self);
        if self.frames.len() != depth + 1 {
            return Err(SchemaError::FrameMismatch);
        }
        let popped: Box<dyn Any> = self.frames.pop().ok_or(SchemaError::FrameMismatch)?;
        let frame = popped
            .downcast::<F>()
            .map_err(|_| SchemaError::FrameMismatch)?;
        Ok((*frame, output))
    }

    // ===== Structure tracking =====

    fn tracker(&mut self) -> Option<&mut dyn KeyTracker> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.as_key_tracker())
    }

    /// Runs `body` with `key` as the current path step.
    ///
    /// Outside a structure cleaner this only runs `body`.
    pub fn checked_key<R>(&mut self, key: impl Into<PathKey>, body: impl FnOnce(&mut Self) -> R) -> R {
        let tracked = match self.tracker() {
            Some(tracker) => {
                tracker.enter_key(key.into());
                true
            }
            None => false,
        };
        let output = body(self);
        if tracked && let Some(tracker) = self.tracker() {
            tracker.leave_key();
        }
        output
    }

    /// Declares that the current value's children are checked one by one.
    pub fn will_check(&mut self) {
        if let Some(tracker) = self.tracker() {
            tracker.will_check();
        }
    }

    /// Passes a record built by a nested structure cleaner to the enclosing one.
    pub fn checked_schema(&mut self, record: CheckedSchema) {
        if let Some(tracker) = self.tracker() {
            tracker.merge_checked(record);
        }
    }

    /// Runs `body` without recording any checked keys.
    pub fn ignore_checks<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.tracker().map(|tracker| tracker.set_ignoring(true));
        let output = body(self);
        if let Some(previous) = previous
            && let Some(tracker) = self.tracker()
        {
            tracker.set_ignoring(previous);
        }
        output
    }

    // ===== User context =====

    /// Reads a variable supplied with `with_context`, innermost first.
    pub fn context_var(&self, name: &str) -> Result<Value, SchemaError> {
        let mut has_bag = false;
        for frame in self.frames.iter().rev() {
            if let Some(bag) = frame.as_variable_bag() {
                has_bag = true;
                if let Some(value) = bag.variable(name) {
                    return Ok(value.clone());
                }
            }
        }
        if has_bag {
            Err(SchemaError::ContextKeyMissing {
                key: name.to_owned(),
            })
        } else {
            Err(SchemaError::capability("context"))
        }
    }

    // ===== Localization arguments =====

    /// Adds an argument to the message of the enclosing i18n node.
    pub fn i18n_var(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<(), SchemaError> {
        let args = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.as_i18n_args())
            .ok_or_else(|| SchemaError::capability("i18n_var"))?;
        args.set_arg(name.into(), value.into());
        Ok(())
    }

    pub fn i18n_vars(&mut self, vars: impl IntoIterator<Item = (String, Value)>) -> Result<(), SchemaError> {
        for (name, value) in vars {
            self.i18n_var(name, value)?;
        }
        Ok(())
    }

    // ===== Object-bound state =====

    fn object_state(&mut self) -> Result<&mut dyn ObjectState, SchemaError> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.as_object_state())
            .ok_or_else(|| SchemaError::capability("object"))
    }

    /// Reads a field of the object bound with `with_object_context`.
    pub fn object_field(&mut self, name: &str) -> Result<Value, SchemaError> {
        self.object_state()?
            .field(name)
            .cloned()
            .ok_or_else(|| SchemaError::ObjectFieldMissing {
                field: name.to_owned(),
            })
    }

    /// Updates a field of the bound object; written back after the call.
    pub fn set_object_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SchemaError> {
        if self.object_state()?.set_field(name, value.into()) {
            Ok(())
        } else {
            Err(SchemaError::ObjectFieldMissing {
                field: name.to_owned(),
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Marker(u32);

    impl ContextFrame for Marker {}

    #[test]
    fn test_with_frame_returns_frame_and_output() {
        let mut rt = Runtime::new();
        let (frame, output) = rt
            .with_frame(Marker(7), |rt| {
                assert_eq!(rt.depth(), 1);
                "done"
            })
            .unwrap();
        assert_eq!(frame.0, 7);
        assert_eq!(output, "done");
        assert_eq!(rt.depth(), 0);
    }

    #[test]
    fn test_structural_calls_without_tracker_are_noops() {
        let mut rt = Runtime::new();
        rt.will_check();
        let value = rt.checked_key("a", |_| 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_checked_key_records_in_tracker() {
        let mut rt = Runtime::new();
        let (tracker, ()) = rt
            .with_frame(StructureTracker::new(), |rt| {
                rt.will_check();
                rt.checked_key("a", |_| ());
                rt.ignore_checks(|rt| rt.checked_key("b", |_| ()));
            })
            .unwrap();

        let record = tracker.into_record();
        assert_eq!(record.get(&PathKey::from("a")), Some(&CheckedSchema::Full));
        assert_eq!(record.get(&PathKey::from("b")), None);
    }

    #[test]
    fn test_missing_capabilities() {
        let mut rt = Runtime::new();
        assert!(matches!(
            rt.context_var("x"),
            Err(SchemaError::CapabilityMissing { capability: "context" })
        ));
        assert!(matches!(
            rt.i18n_var("x", 1),
            Err(SchemaError::CapabilityMissing { .. })
        ));
        assert!(matches!(
            rt.object_field("x"),
            Err(SchemaError::CapabilityMissing { .. })
        ));
    }
}
