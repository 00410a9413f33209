//! Localization nodes.
//!
//! An [`I18nNode`] rewrites the errors of a failed subtree with its
//! [`I18nValue`]: a key replaces the error keys, a scope prefixes relative
//! ones, a bare argument set only adds arguments. Casters below the node may
//! add arguments at runtime with [`Runtime::i18n_var`]; those take precedence
//! over the node's own.

use indexmap::IndexMap;

use crate::foundation::{Cast, CastResult, ErrorItem, ErrorTree, Schema, SchemaError};
use crate::i18n::{Args, I18nValue};
use crate::json_schema::JsonSchema;
use crate::runtime::{ContextFrame, I18nArgs, Runtime};
use crate::value::Value;

#[derive(Debug, Default)]
struct ArgsFrame(Args);

impl I18nArgs for ArgsFrame {
    fn set_arg(&mut self, name: String, value: Value) {
        self.0.insert(name, value);
    }
}

impl ContextFrame for ArgsFrame {
    fn as_i18n_args(&mut self) -> Option<&mut dyn I18nArgs> {
        Some(self)
    }
}

/// Applies a localization value to the errors of its base.
#[derive(Debug, Clone)]
pub struct I18nNode {
    base: Schema,
    value: I18nValue,
}

impl I18nNode {
    pub fn new(base: Schema, value: I18nValue) -> Self {
        Self { base, value }
    }
}

impl Cast for I18nNode {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let (frame, result) = rt.with_frame(ArgsFrame::default(), |rt| self.base.cast(input, rt))?;
        match result? {
            valid @ CastResult::Valid(_) => Ok(valid),
            CastResult::Invalid(errors) => {
                let value = self.value.clone().with_args(frame.0);
                Ok(CastResult::invalid(value.apply(errors)?))
            }
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

/// Renames the error key of a single-error failure.
///
/// Only a failure consisting of exactly one localized error is touched; the
/// first candidate key found in the mapping wins.
#[derive(Debug, Clone)]
pub struct I18nMapKeys {
    base: Schema,
    mapping: IndexMap<String, String>,
}

impl I18nMapKeys {
    pub fn new(base: Schema, mapping: IndexMap<String, String>) -> Self {
        Self { base, mapping }
    }

    fn remap(&self, errors: ErrorTree) -> ErrorTree {
        let mut items = match errors {
            ErrorTree::List(items) => items,
            map @ ErrorTree::Map(_) => return map,
        };
        if let [ErrorItem::I18n(value)] = items.as_slice()
            && let Some(mapped) = value
                .keys()
                .and_then(|keys| keys.iter().find_map(|key| self.mapping.get(key)))
        {
            let remapped = I18nValue::key([mapped.clone()]).with_args(value.args().clone());
            items = vec![ErrorItem::I18n(remapped)];
        }
        ErrorTree::List(items)
    }
}

impl Cast for I18nMapKeys {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        match self.base.cast(input, rt)? {
            valid @ CastResult::Valid(_) => Ok(valid),
            CastResult::Invalid(errors) => Ok(CastResult::invalid(self.remap(errors))),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

// ============================================================================
// TESTS
// ============================================================================
