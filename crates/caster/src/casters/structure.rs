//! Structural casters: hashes, arrays and hash mapping.
//!
//! [`hash_schema`] and [`array_schema`] validate children one by one and
//! report each checked key to the enclosing structure cleaner, so unlisted
//! keys can be rejected or stripped. [`transform_to_hash`] builds a new hash
//! from casters that each see the whole input.

use indexmap::IndexMap;

use crate::foundation::{Cast, CastResult, ErrorKey, ErrorTree, Schema, SchemaError};
use crate::i18n::error_key;
use crate::json_schema::JsonSchema;
use crate::runtime::Runtime;
use crate::value::{Hash, Value};

// ============================================================================
// HASH SCHEMA
// ============================================================================

/// Validates listed keys of a hash; other keys pass through to the cleaner.
#[derive(Debug, Clone)]
pub struct HashSchema {
    fields: Vec<(String, Schema)>,
}

impl Cast for HashSchema {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let mut hash = match input {
            Value::Hash(hash) => hash,
            other => {
                return Ok(CastResult::invalid(
                    error_key("hash_value").with_arg("value", other),
                ));
            }
        };

        rt.will_check();

        let mut errors = IndexMap::new();
        let mut outputs = Vec::with_capacity(self.fields.len());
        for (key, field) in &self.fields {
            let value = hash.get(key).cloned().unwrap_or(Value::Absent);
            match rt.checked_key(key.as_str(), |rt| field.cast(value, rt))? {
                CastResult::Valid(value) => outputs.push((key.clone(), value)),
                CastResult::Invalid(tree) => {
                    errors.insert(ErrorKey::Name(key.clone()), tree);
                }
            }
        }

        // An empty tree still marks its field as failed.
        if !errors.is_empty() {
            return Ok(CastResult::invalid(ErrorTree::Map(errors)));
        }

        for (key, value) in outputs {
            hash.insert(key, value);
        }
        hash.retain(|_, value| !value.is_absent());
        Ok(CastResult::valid(Value::Hash(hash)))
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let mut schema = JsonSchema::object();
        for (key, field) in &self.fields {
            schema = schema.with_property(key.clone(), field.json_schema()?);
            if !field.is_optional() {
                schema = schema.with_required(key.clone());
            }
        }
        Ok(schema)
    }
}

/// Validates a hash field by field.
///
/// ```rust,ignore
/// let user = hash_schema([("name", string()), ("age", optional(integer()))]);
/// ```
pub fn hash_schema<I, K, S>(fields: I) -> Schema
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<Schema>,
{
    Schema::new(HashSchema {
        fields: fields
            .into_iter()
            .map(|(key, field)| (key.into(), field.into()))
            .collect(),
    })
}

// ============================================================================
// ARRAY SCHEMA
// ============================================================================

/// Validates every element of a non-empty array with one caster.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Schema,
}

impl Cast for ArraySchema {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let items = match input {
            Value::Array(items) if items.is_empty() => {
                return Ok(CastResult::invalid(
                    error_key("empty").with_arg("value", Value::Array(items)),
                ));
            }
            Value::Array(items) => items,
            other => {
                return Ok(CastResult::invalid(error_key("array").with_arg("value", other)));
            }
        };

        rt.will_check();

        let mut errors = IndexMap::new();
        let mut outputs = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match rt.checked_key(index, |rt| self.element.cast(item, rt))? {
                CastResult::Valid(value) => outputs.push(value),
                CastResult::Invalid(tree) => {
                    errors.insert(ErrorKey::Index(index), tree);
                }
            }
        }

        if errors.is_empty() {
            Ok(CastResult::valid(Value::Array(outputs)))
        } else {
            Ok(CastResult::invalid(ErrorTree::Map(errors)))
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::of_type("array").with("items", self.element.json_schema()?.into_value()))
    }
}

pub fn array_schema(element: impl Into<Schema>) -> Schema {
    Schema::new(ArraySchema {
        element: element.into(),
    })
}

// ============================================================================
// HASH MAPPER
// ============================================================================

/// Builds hash entries from casters that see the whole input.
///
/// A field with several output keys must produce an array with one value
/// per key. The casters run with checked-key recording suspended; only the
/// output keys are marked as checked.
#[derive(Debug, Clone)]
pub struct HashMapper {
    fields: Vec<(Vec<String>, Schema)>,
}

impl HashMapper {
    fn spread(keys: &[String], value: Value) -> Result<Vec<(String, Value)>, SchemaError> {
        if let [key] = keys {
            return Ok(vec![(key.clone(), value)]);
        }
        let values = match value {
            Value::Array(values) => values,
            other => vec![other],
        };
        if values.len() != keys.len() {
            return Err(SchemaError::MappingArity {
                keys: keys.to_vec(),
                expected: keys.len(),
                actual: values.len(),
            });
        }
        Ok(keys.iter().cloned().zip(values).collect())
    }
}

impl Cast for HashMapper {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        rt.will_check();

        let mut errors = ErrorTree::map();
        let mut failed = false;
        let mut outputs = Vec::new();
        for (keys, field) in &self.fields {
            let result = rt.ignore_checks(|rt| field.cast(input.clone(), rt))?;
            match result {
                CastResult::Valid(value) => {
                    for (key, value) in Self::spread(keys, value)? {
                        rt.checked_key(key.as_str(), |_| ());
                        outputs.push((key, value));
                    }
                }
                CastResult::Invalid(tree) => {
                    failed = true;
                    for key in keys {
                        errors.insert(key.as_str(), tree.clone());
                    }
                }
            }
        }

        if failed {
            return Ok(CastResult::invalid(errors));
        }

        let mut hash = match input {
            Value::Hash(hash) => hash,
            _ => Hash::new(),
        };
        for (key, value) in outputs {
            hash.insert(key, value);
        }
        hash.retain(|_, value| !value.is_absent());
        Ok(CastResult::valid(Value::Hash(hash)))
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let mut schema = JsonSchema::object();
        for (keys, _) in &self.fields {
            for key in keys {
                schema = schema.with_property(key.clone(), JsonSchema::new());
            }
        }
        Ok(schema)
    }
}

/// Output keys of one [`transform_to_hash`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedKeys(Vec<String>);

impl From<&str> for MappedKeys {
    fn from(key: &str) -> Self {
        Self(vec![key.to_owned()])
    }
}

impl From<String> for MappedKeys {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl<const N: usize> From<[&str; N]> for MappedKeys {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.iter().map(|key| (*key).to_owned()).collect())
    }
}

impl From<Vec<String>> for MappedKeys {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

/// Maps the input to a hash.
///
/// ```rust,ignore
/// let names = transform_to_hash([
///     (MappedKeys::from("full"), transform(|v| ...)),
///     (MappedKeys::from(["first", "last"]), pick_all(["first", "last"])),
/// ]);
/// ```
pub fn transform_to_hash<I, K, S>(fields: I) -> Schema
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<MappedKeys>,
    S: Into<Schema>,
{
    Schema::new(HashMapper {
        fields: fields
            .into_iter()
            .map(|(keys, field)| (keys.into().0, field.into()))
            .collect(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
