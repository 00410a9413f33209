//! SWITCH combinator - first matching branch wins
//!
//! A switch optionally selects a sub-value (a key, a key path, or the output
//! of any caster), then tries each branch predicate against it in declared
//! order. The clause of the first predicate that succeeds runs on the
//! original input. Without a match, the else branch runs if attached;
//! otherwise the switch fails with the `switch` error key.
//!
//! Without a selector, keys checked by a predicate count as checked. Key
//! selectors mark the selected key as checked, so
//! `schema(switch_on("kind").on_value("a", hash_schema([("x", integer())])))`
//! accepts `{"kind": "a", "x": 1}` even though the clause never looks at
//! `kind`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let shape = switch_on("kind")
//!     .on_value("circle", hash_schema([("radius", float())]))
//!     .on_value("square", hash_schema([("side", float())]))
//!     .otherwise(hash_schema([("points", array())]))?;
//! ```

use crate::casters::{compare, pick_path, run};
use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::i18n::error_key;
use crate::json_schema::JsonSchema;
use crate::runtime::{PathKey, Runtime};
use crate::value::Value;

/// Multi-branch caster; see the module docs.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    selector: Option<Schema>,
    key_path: Vec<PathKey>,
    branches: Vec<(Schema, Schema)>,
    otherwise: Option<Schema>,
}

/// Switch on the input itself.
pub fn switch() -> Switch {
    Switch::default()
}

/// Switch on the value of hash key `key`.
pub fn switch_on(key: impl Into<String>) -> Switch {
    switch_on_path([PathKey::Name(key.into())])
}

/// Switch on the value at a nested key path.
pub fn switch_on_path<I, K>(path: I) -> Switch
where
    I: IntoIterator<Item = K>,
    K: Into<PathKey>,
{
    let key_path: Vec<PathKey> = path.into_iter().map(Into::into).collect();
    let marked = key_path.clone();
    let selector = run(move |_, rt| {
        mark_path(rt, &marked);
        Ok(())
    }) & pick_path(key_path.clone());
    Switch {
        selector: Some(selector),
        key_path,
        ..Switch::default()
    }
}

/// Switch on the value produced by `selector`.
pub fn switch_by(selector: impl Into<Schema>) -> Switch {
    Switch {
        selector: Some(selector.into()),
        ..Switch::default()
    }
}

/// Marks the last key of `path` as checked, and the keys before it as
/// partially checked.
fn mark_path(rt: &mut Runtime, path: &[PathKey]) {
    if let Some((first, rest)) = path.split_first() {
        rt.checked_key(first.clone(), |rt| {
            if !rest.is_empty() {
                rt.will_check();
                mark_path(rt, rest);
            }
        });
    }
}

impl Switch {
    /// Adds a branch: `clause` runs when `predicate` accepts the selected value.
    #[must_use = "builder methods must be chained or built"]
    pub fn on(mut self, predicate: impl Into<Schema>, clause: impl Into<Schema>) -> Self {
        self.branches.push((predicate.into(), clause.into()));
        self
    }

    /// Adds a branch taken when the selected value equals `value`.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_value(self, value: impl Into<Value>, clause: impl Into<Schema>) -> Self {
        self.on(compare(value), clause)
    }

    /// Attaches the else branch.
    pub fn otherwise(mut self, otherwise: impl Into<Schema>) -> Result<Self, SchemaError> {
        if self.otherwise.is_some() {
            return Err(SchemaError::DuplicateElse);
        }
        self.otherwise = Some(otherwise.into());
        Ok(self)
    }
}

impl Cast for Switch {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if self.branches.is_empty() {
            return Err(SchemaError::EmptySwitch);
        }

        let selected = match &self.selector {
            Some(selector) => match selector.cast(input.clone(), rt)? {
                CastResult::Valid(value) => value,
                invalid @ CastResult::Invalid(_) => return Ok(invalid),
            },
            None => input.clone(),
        };

        for (index, (predicate, clause)) in self.branches.iter().enumerate() {
            // A selected sub-value would report its keys at the wrong level.
            let matched = if self.selector.is_some() {
                rt.ignore_checks(|rt| predicate.cast(selected.clone(), rt))?
            } else {
                predicate.cast(selected.clone(), rt)?
            };
            if matched.is_valid() {
                tracing::trace!(branch = index, "switch branch matched");
                return clause.cast(input, rt);
            }
        }

        match &self.otherwise {
            Some(otherwise) => otherwise.cast(input, rt),
            None => Ok(CastResult::invalid(
                error_key("switch").with_arg("value", selected),
            )),
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let mut variants = Vec::with_capacity(self.branches.len() + 1);
        for (predicate, clause) in &self.branches {
            let variant = match self.key_path.as_slice() {
                [PathKey::Name(key)] => JsonSchema::object()
                    .with_property(key.clone(), predicate.json_schema()?)
                    .with_required(key.clone())
                    .apply(clause.json_schema()?)?,
                _ => clause.json_schema()?,
            };
            variants.push(variant);
        }
        if let Some(otherwise) = &self.otherwise {
            variants.push(otherwise.json_schema()?);
        }
        Ok(JsonSchema::one_of(variants))
    }
}
