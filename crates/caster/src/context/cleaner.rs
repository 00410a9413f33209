//! Structure cleaner: removes or rejects keys nobody checked.
//!
//! A cleaner runs its base inside a fresh [`StructureTracker`]. Structural
//! casters below it report each key they validate; once the base succeeds,
//! the collected record is applied to the output. What happens to keys that
//! are not in the record depends on the [`CleanPolicy`].
//!
//! ```rust,ignore
//! use nebula_caster::prelude::*;
//!
//! let strict = schema(hash_schema([("a", integer())]));
//! assert!(strict.call(json!({"a": 1, "b": 2}))?.is_invalid());
//!
//! let choosy = choosy_schema(hash_schema([("a", integer())]));
//! // {"a": 1}
//! let stripped = choosy.call(json!({"a": 1, "b": 2}))?;
//! ```

use indexmap::IndexMap;

use crate::foundation::{Cast, CastResult, ErrorKey, ErrorTree, Schema, SchemaError};
use crate::i18n::error_key;
use crate::json_schema::JsonSchema;
use crate::runtime::{CheckedSchema, PathKey, Runtime, StructureTracker};
use crate::value::Value;

/// What a cleaner does with keys that were never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanPolicy {
    /// Report them as `must_be_absent` failures.
    Fail,
    /// Drop them from the output.
    Strip,
    /// Keep them as they are.
    Pass,
}

/// Wraps a schema with a structure cleaner.
#[derive(Debug, Clone)]
pub struct StructureCleaner {
    base: Schema,
    policy: CleanPolicy,
}

impl StructureCleaner {
    pub fn new(base: Schema, policy: CleanPolicy) -> Self {
        Self { base, policy }
    }

    pub fn policy(&self) -> CleanPolicy {
        self.policy
    }

    fn reject(key: &ErrorKey, value: Value) -> ErrorTree {
        tracing::trace!(%key, "rejecting unchecked key");
        ErrorTree::single(error_key("must_be_absent").with_arg("value", value))
    }

    fn unchecked(&self, key: ErrorKey, value: Value) -> Option<Result<Value, ErrorTree>> {
        match self.policy {
            CleanPolicy::Fail => Some(Err(Self::reject(&key, value))),
            CleanPolicy::Strip => {
                tracing::trace!(%key, "stripping unchecked key");
                None
            }
            CleanPolicy::Pass => Some(Ok(value)),
        }
    }

    fn clean(&self, value: Value, record: &CheckedSchema) -> Result<CastResult, SchemaError> {
        let children = match record {
            CheckedSchema::Partial(children) => children,
            CheckedSchema::Full | CheckedSchema::Unknown => return Ok(CastResult::valid(value)),
        };

        let mut errors = IndexMap::new();
        let cleaned = match value {
            Value::Hash(hash) => {
                let mut output = IndexMap::with_capacity(hash.len());
                for (key, item) in hash {
                    if item.is_absent() {
                        continue;
                    }
                    let path = PathKey::Name(key.clone());
                    match self.clean_child(children.get(&path), path.into(), item)? {
                        Some(Ok(item)) => {
                            output.insert(key, item);
                        }
                        Some(Err(tree)) => {
                            errors.insert(ErrorKey::Name(key), tree);
                        }
                        None => {}
                    }
                }
                Value::Hash(output)
            }
            // Unchecked indices are rejected even when stripping.
            Value::Array(items) => {
                let mut output = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let key = ErrorKey::Index(index);
                    let cleaned = match children.get(&PathKey::Index(index)) {
                        Some(record) => self.clean(item, record)?.into_std(),
                        None => Err(Self::reject(&key, item)),
                    };
                    match cleaned {
                        Ok(item) => output.push(item),
                        Err(tree) => {
                            errors.insert(key, tree);
                        }
                    }
                }
                Value::Array(output)
            }
            other => {
                return Err(SchemaError::CleanerShape {
                    kind: other.kind().name(),
                });
            }
        };

        if errors.is_empty() {
            Ok(CastResult::valid(cleaned))
        } else {
            Ok(CastResult::invalid(ErrorTree::Map(errors)))
        }
    }

    fn clean_child(
        &self,
        record: Option<&CheckedSchema>,
        key: ErrorKey,
        value: Value,
    ) -> Result<Option<Result<Value, ErrorTree>>, SchemaError> {
        match record {
            Some(record) => Ok(Some(self.clean(value, record)?.into_std())),
            None => Ok(self.unchecked(key, value)),
        }
    }
}

impl Cast for StructureCleaner {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let (tracker, result) =
            rt.with_frame(StructureTracker::new(), |rt| self.base.cast(input, rt))?;

        let value = match result? {
            CastResult::Valid(value) => value,
            invalid @ CastResult::Invalid(_) => return Ok(invalid),
        };
        if tracker.unchecked() {
            return Ok(CastResult::valid(value));
        }

        let record = tracker.into_record();
        let cleaned = match self.policy {
            CleanPolicy::Pass => CastResult::valid(value),
            CleanPolicy::Fail | CleanPolicy::Strip => self.clean(value, &record)?,
        };
        if cleaned.is_valid() {
            rt.checked_schema(record);
        }
        Ok(cleaned)
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

/// Rejects keys that were not checked.
pub fn schema(base: impl Into<Schema>) -> Schema {
    Schema::new(StructureCleaner::new(base.into(), CleanPolicy::Fail))
}

/// Drops keys that were not checked.
pub fn choosy_schema(base: impl Into<Schema>) -> Schema {
    Schema::new(StructureCleaner::new(base.into(), CleanPolicy::Strip))
}

/// Keeps keys that were not checked, but still reports the checked ones to
/// an enclosing cleaner.
pub fn partial_schema(base: impl Into<Schema>) -> Schema {
    Schema::new(StructureCleaner::new(base.into(), CleanPolicy::Pass))
}

// ============================================================================
// TESTS
// ============================================================================
