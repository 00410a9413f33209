//! Dynamic values that casters operate on.
//!
//! [`Value`] mirrors the JSON data model with two differences: integers and
//! floats are distinct variants, and [`Value::Absent`] marks a field that was
//! not present in the input (or was deliberately not produced by a caster).
//! Hashes keep insertion order.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_caster::value::Value;
//! use serde_json::json;
//!
//! let value = Value::from(json!({"name": "alice", "age": 30}));
//! assert_eq!(value.get("age"), Some(&Value::Int(30)));
//! assert!(value.get("missing").is_none());
//! ```

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered hash of values.
pub type Hash = IndexMap<String, Value>;

// ============================================================================
// VALUE
// ============================================================================

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Exact decimal, produced by `decimal`. Serialized as a string.
    Decimal(Decimal),
    /// UTF-8 string.
    String(String),
    /// Ordered list.
    Array(Vec<Value>),
    /// Insertion-ordered hash.
    Hash(Hash),
    /// Field not present; dropped from hashes by structural casters.
    Absent,
}

/// The kind of a [`Value`], used in error arguments and `must_be` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    String,
    Array,
    Hash,
    Absent,
}

impl Kind {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Array => "array",
            Self::Hash => "hash",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Decimal(_) => Kind::Decimal,
            Self::String(_) => Kind::String,
            Self::Array(_) => Kind::Array,
            Self::Hash(_) => Kind::Hash,
            Self::Absent => Kind::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&Hash> {
        match self {
            Self::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Looks up a key in a hash value. Returns `None` for non-hashes.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_hash().and_then(|hash| hash.get(key))
    }

    /// Converts into a `serde_json::Value`.
    ///
    /// `Absent` becomes `null` at the top level and in arrays, and is
    /// omitted from hashes.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null | Self::Absent => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Decimal(d) => serde_json::Value::String(d.to_string()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => items.iter().map(Self::to_json).collect(),
            Self::Hash(hash) => serde_json::Value::Object(
                hash.iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::String(s) => f.write_str(s),
            Self::Decimal(d) => write!(f, "{d}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Hash> for Value {
    fn from(hash: Hash) -> Self {
        Self::Hash(hash)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Hash(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Absent => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Decimal(d) => serializer.collect_str(d),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Hash(hash) => {
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in hash.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_integer_and_float_apart() {
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert_eq!(Value::from(json!(3.5)), Value::Float(3.5));
    }

    #[test]
    fn test_hash_order_preserved() {
        let mut hash = Hash::new();
        hash.insert("b".into(), Value::Int(1));
        hash.insert("a".into(), Value::Int(2));
        let value = Value::Hash(hash);
        let keys: Vec<_> = value.as_hash().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn test_absent_dropped_from_json_hash() {
        let mut hash = Hash::new();
        hash.insert("a".into(), Value::Int(1));
        hash.insert("b".into(), Value::Absent);
        assert_eq!(Value::Hash(hash).to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let value = Value::from(json!({"list": [1, "x", null], "flag": true}));
        let serialized = serde_json::to_value(&value).unwrap();
        assert_eq!(serialized, value.to_json());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Absent.to_string(), "");
        assert_eq!(Value::from(json!([1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_decimal_renders_as_string() {
        let value = Value::Decimal(Decimal::new(1050, 2));
        assert_eq!(value.to_json(), json!("10.50"));
        assert_eq!(value.to_string(), "10.50");
        assert_eq!(serde_json::to_value(&value).unwrap(), json!("10.50"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Hash(Hash::new()).kind().name(), "hash");
        assert_eq!(Value::Bool(true).kind().to_string(), "boolean");
    }
}
