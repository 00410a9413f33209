//! Predefined casters
//!
//! Type checks (`string`, `integer`, ...) pass the input through unchanged.
//! Conversions (`to_integer`, `to_float`, `to_boolean`, `decimal`, `iso8601`) replace
//! it. Every failure reports `Key([".<name>", "datacaster.errors.<name>"])`
//! with the offending input as the `value` argument.

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::casters::{check, transform, transform_with};
use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::i18n::{Args, I18nValue, error_key};
use crate::json_schema::JsonSchema;
use crate::runtime::{PathKey, Runtime};
use crate::value::{Kind, Value};

fn failure(name: &str, input: Value) -> CastResult {
    CastResult::invalid(error_key(name).with_arg("value", input))
}

// ============================================================================
// TYPE CHECKS
// ============================================================================

/// Passes values accepted by `accepts`, failing with the `name` error key.
#[derive(Debug, Clone)]
pub struct TypeCheck {
    name: &'static str,
    accepts: fn(&Value) -> bool,
    json_schema: fn() -> JsonSchema,
}

impl Cast for TypeCheck {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if (self.accepts)(&input) {
            Ok(CastResult::valid(input))
        } else {
            Ok(failure(self.name, input))
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok((self.json_schema)())
    }
}

fn type_check(
    name: &'static str,
    accepts: fn(&Value) -> bool,
    json_schema: fn() -> JsonSchema,
) -> Schema {
    Schema::new(TypeCheck {
        name,
        accepts,
        json_schema,
    })
}

/// Passes only an absent value.
pub fn absent() -> Schema {
    type_check("absent", Value::is_absent, JsonSchema::new)
}

/// Passes anything but an absent value.
pub fn any() -> Schema {
    type_check("any", |v| !v.is_absent(), JsonSchema::new)
}

pub fn string() -> Schema {
    type_check(
        "string",
        |v| matches!(v, Value::String(_)),
        || JsonSchema::of_type("string"),
    )
}

pub fn non_empty_string() -> Schema {
    type_check(
        "non_empty_string",
        |v| v.as_str().is_some_and(|s| !s.is_empty()),
        || JsonSchema::of_type("string").with("minLength", 1),
    )
}

pub fn integer() -> Schema {
    type_check(
        "integer",
        |v| matches!(v, Value::Int(_)),
        || JsonSchema::of_type("integer"),
    )
}

/// Integer within the `i32` range.
pub fn integer32() -> Schema {
    type_check(
        "integer32",
        |v| matches!(v, Value::Int(n) if i32::try_from(*n).is_ok()),
        || {
            JsonSchema::of_type("integer")
                .with("minimum", i32::MIN)
                .with("maximum", i32::MAX)
        },
    )
}

pub fn float() -> Schema {
    type_check(
        "float",
        |v| matches!(v, Value::Float(_)),
        || JsonSchema::of_type("number"),
    )
}

pub fn boolean() -> Schema {
    type_check(
        "boolean",
        |v| matches!(v, Value::Bool(_)),
        || JsonSchema::of_type("boolean"),
    )
}

/// Any array, including an empty one.
pub fn array() -> Schema {
    type_check(
        "array",
        |v| matches!(v, Value::Array(_)),
        || JsonSchema::of_type("array"),
    )
}

pub fn hash_value() -> Schema {
    type_check(
        "hash_value",
        |v| matches!(v, Value::Hash(_)),
        || JsonSchema::of_type("object"),
    )
}

/// Passes values of the given kind; the `reference` argument names it.
#[derive(Debug, Clone, Copy)]
pub struct MustBe {
    kind: Kind,
}

impl Cast for MustBe {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if input.kind() == self.kind {
            Ok(CastResult::valid(input))
        } else {
            Ok(must_be_failure(self.kind, input))
        }
    }
}

fn must_be_failure(kind: Kind, input: Value) -> CastResult {
    CastResult::invalid(
        error_key("must_be")
            .with_arg("reference", kind.name())
            .with_arg("value", input),
    )
}

pub fn must_be(kind: Kind) -> Schema {
    Schema::new(MustBe { kind })
}

// ============================================================================
// VALUE REPLACEMENT
// ============================================================================

/// Returns the input unchanged.
pub fn pass() -> Schema {
    transform(|value| value)
}

/// Replaces the input with an absent value, dropping the key from hashes.
pub fn remove() -> Schema {
    transform(|_| Value::Absent)
}

pub fn transform_to_value(value: impl Into<Value>) -> Schema {
    let value = value.into();
    transform(move |_| value.clone())
}

/// Replaces an absent input with `value`.
pub fn default(value: impl Into<Value>) -> Schema {
    let value = value.into();
    transform(move |input| if input.is_absent() { value.clone() } else { input })
}

/// Applies `f` unless the input is absent.
pub fn transform_if_present(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Schema {
    transform(move |input| if input.is_absent() { input } else { f(input) })
}

/// Reads the user context variable `name`, ignoring the input.
pub fn context_value(name: impl Into<String>) -> Schema {
    let name = name.into();
    transform_with(move |_, rt| rt.context_var(&name))
}

// ============================================================================
// OPTIONAL
// ============================================================================

/// Lets absent values through, casts everything else with `base`.
#[derive(Debug, Clone)]
pub struct Optional {
    base: Schema,
    empty_is_absent: bool,
}

impl Cast for Optional {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let blank = self.empty_is_absent
            && (input.is_null() || input.as_str().is_some_and(str::is_empty));
        if input.is_absent() || blank {
            return Ok(CastResult::valid(Value::Absent));
        }
        self.base.cast(input, rt)
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        self.base.json_schema()
    }

    fn is_optional(&self) -> bool {
        true
    }
}

pub fn optional(base: impl Into<Schema>) -> Schema {
    Schema::new(Optional {
        base: base.into(),
        empty_is_absent: false,
    })
}

/// Like [`optional`], also treating `null` and `""` as absent. Meant for
/// form and query parameters.
pub fn optional_param(base: impl Into<Schema>) -> Schema {
    Schema::new(Optional {
        base: base.into(),
        empty_is_absent: true,
    })
}

// ============================================================================
// PICKING
// ============================================================================

/// Extracts a value at a key path; missing keys yield an absent value.
#[derive(Debug, Clone)]
pub struct Pick {
    paths: Vec<Vec<PathKey>>,
    many: bool,
}

fn dig(input: &Value, path: &[PathKey]) -> Result<Value, Kind> {
    let mut current = input;
    for key in path {
        current = match (key, current) {
            (_, Value::Absent) => return Ok(Value::Absent),
            (PathKey::Name(name), Value::Hash(hash)) => match hash.get(name) {
                Some(value) => value,
                None => return Ok(Value::Absent),
            },
            (PathKey::Index(index), Value::Array(items)) => match items.get(*index) {
                Some(value) => value,
                None => return Ok(Value::Absent),
            },
            (PathKey::Name(_), _) => return Err(Kind::Hash),
            (PathKey::Index(_), _) => return Err(Kind::Array),
        };
    }
    Ok(current.clone())
}

impl Cast for Pick {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let mut picked = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            match dig(&input, path) {
                Ok(value) => picked.push(value),
                Err(kind) => return Ok(must_be_failure(kind, input)),
            }
        }
        if self.many {
            Ok(CastResult::valid(Value::Array(picked)))
        } else {
            Ok(CastResult::valid(picked.pop().unwrap_or(Value::Absent)))
        }
    }
}

/// Extracts the value of hash key `key`.
pub fn pick(key: impl Into<String>) -> Schema {
    pick_path([PathKey::Name(key.into())])
}

/// Extracts several keys as an array, in the given order.
pub fn pick_all<I, K>(keys: I) -> Schema
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    Schema::new(Pick {
        paths: keys
            .into_iter()
            .map(|key| vec![PathKey::Name(key.into())])
            .collect(),
        many: true,
    })
}

/// Extracts the value at a nested path of hash keys and array indices.
pub fn pick_path<I, K>(path: I) -> Schema
where
    I: IntoIterator<Item = K>,
    K: Into<PathKey>,
{
    Schema::new(Pick {
        paths: vec![path.into_iter().map(Into::into).collect()],
        many: false,
    })
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// 2^63: whole floats in `[-2^63, 2^63)` convert to `i64` exactly.
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn whole_float_to_i64(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && (-I64_FLOAT_BOUND..I64_FLOAT_BOUND).contains(&f))
        .then_some(f as i64)
}

/// Converts strings and whole floats to integers.
///
/// Floats outside the `i64` range fail instead of saturating.
pub fn to_integer() -> Schema {
    crate::casters::cast(|input, _| {
        let converted = match &input {
            Value::Int(n) => Some(*n),
            Value::Float(f) => whole_float_to_i64(*f),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Ok(match converted {
            Some(n) => CastResult::valid(Value::Int(n)),
            None => failure("to_integer", input),
        })
    })
}

/// Converts integers and numeric strings to floats.
pub fn to_float() -> Schema {
    crate::casters::cast(|input, _| {
        let converted = match &input {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        };
        Ok(match converted {
            Some(f) => CastResult::valid(Value::Float(f)),
            None => failure("to_float", input),
        })
    })
}

/// Accepts `true`/`false`, `"true"`/`"false"`, `"1"`/`"0"` and `1`/`0`.
pub fn to_boolean() -> Schema {
    crate::casters::cast(|input, _| {
        let converted = match &input {
            Value::Bool(b) => Some(*b),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        Ok(match converted {
            Some(b) => CastResult::valid(Value::Bool(b)),
            None => failure("to_boolean", input),
        })
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Converts numbers and numeric strings to an exact [`Decimal`].
///
/// Floats are rounded to `digits` significant digits; integers and strings
/// convert exactly.
pub fn decimal(digits: u32) -> Schema {
    crate::casters::cast(move |input, _| {
        let converted = match &input {
            Value::Decimal(d) => Some(*d),
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Float(f) => Decimal::from_f64(*f).and_then(|d| d.round_sf(digits)),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        };
        Ok(match converted {
            Some(d) => CastResult::valid(Value::Decimal(d)),
            None => failure("decimal", input),
        })
    })
}

/// Parses an ISO-8601 date-time string, normalizing it to RFC 3339.
#[derive(Debug, Clone, Copy)]
pub struct Iso8601;

impl Cast for Iso8601 {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let parsed = input
            .as_str()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok());
        Ok(match parsed {
            Some(datetime) => CastResult::valid(Value::String(datetime.to_rfc3339())),
            None => failure("iso8601", input),
        })
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::of_type("string").with("format", "date-time"))
    }
}

pub fn iso8601() -> Schema {
    Schema::new(Iso8601)
}

// ============================================================================
// MEMBERSHIP AND PATTERNS
// ============================================================================

/// Passes strings matching a regular expression.
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: Regex,
}

impl Cast for Matches {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let Some(text) = input.as_str() else {
            return Ok(failure("string", input));
        };
        if self.pattern.is_match(text) {
            Ok(CastResult::valid(input))
        } else {
            Ok(CastResult::invalid(
                error_key("matches")
                    .with_arg("reference", self.pattern.as_str())
                    .with_arg("value", input),
            ))
        }
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        Ok(JsonSchema::of_type("string").with("pattern", self.pattern.as_str()))
    }
}

pub fn matches(pattern: Regex) -> Schema {
    Schema::new(Matches { pattern })
}

/// Passes values equal to one of a fixed list.
#[derive(Debug, Clone)]
pub struct IncludedIn {
    values: Vec<Value>,
}

impl Cast for IncludedIn {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        if self.values.contains(&input) {
            return Ok(CastResult::valid(input));
        }
        let reference = self
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let error: I18nValue = error_key("included_in")
            .with_arg("reference", reference)
            .with_arg("value", input);
        Ok(CastResult::invalid(error))
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let values: Vec<serde_json::Value> = self.values.iter().map(Value::to_json).collect();
        Ok(JsonSchema::new().with("enum", values))
    }
}

pub fn included_in<I, V>(values: I) -> Schema
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Schema::new(IncludedIn {
        values: values.into_iter().map(Into::into).collect(),
    })
}

/// Fails unless `predicate` accepts the input; the error key is `name`.
pub fn check_named(
    name: &'static str,
    predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
) -> Schema {
    check(predicate).i18n_key(
        [format!(".{name}"), format!("datacaster.errors.{name}")],
        Args::new(),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn error_name(result: &CastResult) -> String {
        result.raw_errors().unwrap().items().unwrap()[0].to_string()
    }

    #[rstest]
    #[case(string(), Value::from("a"), true)]
    #[case(string(), Value::Int(1), false)]
    #[case(non_empty_string(), Value::from(""), false)]
    #[case(integer(), Value::Int(1), true)]
    #[case(integer(), Value::Float(1.0), false)]
    #[case(integer32(), Value::Int(i64::from(i32::MAX) + 1), false)]
    #[case(float(), Value::Float(1.5), true)]
    #[case(boolean(), Value::Bool(false), true)]
    #[case(array(), Value::Array(vec![]), true)]
    #[case(hash_value(), Value::Array(vec![]), false)]
    #[case(absent(), Value::Absent, true)]
    #[case(absent(), Value::Null, false)]
    #[case(any(), Value::Null, true)]
    #[case(any(), Value::Absent, false)]
    fn test_type_checks(#[case] schema: Schema, #[case] input: Value, #[case] valid: bool) {
        assert_eq!(schema.call(input).unwrap().is_valid(), valid);
    }

    #[test]
    fn test_type_check_error_key() {
        let result = integer().call("1").unwrap();
        assert_eq!(error_name(&result), ".integer");
    }

    #[rstest]
    #[case(Value::from("12"), Some(12))]
    #[case(Value::from(" 7 "), Some(7))]
    #[case(Value::Float(3.0), Some(3))]
    #[case(Value::Float(3.5), None)]
    #[case(Value::Float(-9_223_372_036_854_775_808.0), Some(i64::MIN))]
    #[case(Value::Float(9_223_372_036_854_775_808.0), None)]
    #[case(Value::Float(1e300), None)]
    #[case(Value::Float(-1e19), None)]
    #[case(Value::Float(f64::NAN), None)]
    #[case(Value::from("x"), None)]
    fn test_to_integer(#[case] input: Value, #[case] expected: Option<i64>) {
        let result = to_integer().call(input).unwrap();
        assert_eq!(result.value().and_then(Value::as_i64), expected);
    }

    #[rstest]
    #[case(Value::from("10.50"), Some(Decimal::new(105, 1)))]
    #[case(Value::from(" -3 "), Some(Decimal::from(-3)))]
    #[case(Value::from("1e3"), Some(Decimal::from(1000)))]
    #[case(Value::Int(7), Some(Decimal::from(7)))]
    #[case(Value::Float(2.5), Some(Decimal::new(25, 1)))]
    #[case(Value::from("1.2.3"), None)]
    #[case(Value::from(""), None)]
    #[case(Value::Float(f64::INFINITY), None)]
    #[case(Value::Bool(true), None)]
    fn test_decimal(#[case] input: Value, #[case] expected: Option<Decimal>) {
        let result = decimal(8).call(input).unwrap();
        assert_eq!(result.value().and_then(Value::as_decimal), expected);
    }

    #[test]
    fn test_decimal_rounds_floats_to_significant_digits() {
        let result = decimal(3).call(Value::Float(3.14159)).unwrap();
        assert_eq!(result.value(), Some(&Value::Decimal(Decimal::new(314, 2))));
        let failed = decimal(8).call("x").unwrap();
        assert_eq!(error_name(&failed), ".decimal");
    }

    #[rstest]
    #[case(Value::from("true"), Some(true))]
    #[case(Value::from("0"), Some(false))]
    #[case(Value::Int(1), Some(true))]
    #[case(Value::from("yes"), None)]
    fn test_to_boolean(#[case] input: Value, #[case] expected: Option<bool>) {
        let result = to_boolean().call(input).unwrap();
        assert_eq!(result.value().and_then(Value::as_bool), expected);
    }

    #[test]
    fn test_to_float() {
        assert_eq!(to_float().call("1.5").unwrap().value(), Some(&Value::Float(1.5)));
        assert_eq!(to_float().call(2).unwrap().value(), Some(&Value::Float(2.0)));
        assert_eq!(error_name(&to_float().call("nan?").unwrap()), ".to_float");
    }

    #[test]
    fn test_optional() {
        let schema = optional(integer());
        assert!(schema.is_optional());
        assert_eq!(schema.call(Value::Absent).unwrap().value(), Some(&Value::Absent));
        assert!(schema.call(Value::Null).unwrap().is_invalid());
        assert!(schema.call("x").unwrap().is_invalid());
    }

    #[test]
    fn test_optional_param_treats_blank_as_absent() {
        let schema = optional_param(to_integer());
        assert_eq!(schema.call("").unwrap().value(), Some(&Value::Absent));
        assert_eq!(schema.call(Value::Null).unwrap().value(), Some(&Value::Absent));
        assert_eq!(schema.call("5").unwrap().value(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_default() {
        let schema = default(10);
        assert_eq!(schema.call(Value::Absent).unwrap().value(), Some(&Value::Int(10)));
        assert_eq!(schema.call(3).unwrap().value(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_pick() {
        let input = Value::from(json!({"a": {"b": [10, 20]}}));
        assert_eq!(
            pick_path([PathKey::from("a"), PathKey::from("b"), PathKey::from(1usize)])
                .call(input.clone())
                .unwrap()
                .value(),
            Some(&Value::Int(20))
        );
        assert_eq!(pick("missing").call(input.clone()).unwrap().value(), Some(&Value::Absent));
        assert_eq!(
            pick_all(["missing", "a"]).call(input).unwrap().value(),
            Some(&Value::Array(vec![Value::Absent, Value::from(json!({"b": [10, 20]}))]))
        );
    }

    #[test]
    fn test_pick_from_scalar_fails() {
        let result = pick("a").call(1).unwrap();
        let errors = result.errors().unwrap().unwrap();
        assert_eq!(errors.to_json(), json!(["is not hash"]));
    }

    #[test]
    fn test_must_be() {
        assert!(must_be(Kind::Array).call(Value::Array(vec![])).unwrap().is_valid());
        let result = must_be(Kind::Array).call(1).unwrap();
        assert_eq!(error_name(&result), ".must_be");
    }

    #[test]
    fn test_iso8601() {
        let result = iso8601().call("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(result.value(), Some(&Value::from("2024-05-01T10:00:00+00:00")));
        assert_eq!(error_name(&iso8601().call("yesterday").unwrap()), ".iso8601");
    }

    #[test]
    fn test_matches() {
        let schema = matches(Regex::new("^[a-z]+$").unwrap());
        assert!(schema.call("abc").unwrap().is_valid());
        assert_eq!(error_name(&schema.call("ABC").unwrap()), ".matches");
        assert_eq!(error_name(&schema.call(1).unwrap()), ".string");
    }

    #[test]
    fn test_included_in() {
        let schema = included_in(["a", "b"]);
        assert!(schema.call("a").unwrap().is_valid());
        assert_eq!(error_name(&schema.call("c").unwrap()), ".included_in");
        assert_eq!(schema.json_schema().unwrap().into_value(), json!({"enum": ["a", "b"]}));
    }

    #[test]
    fn test_context_value() {
        let mut vars = IndexMap::new();
        vars.insert("tenant".to_owned(), Value::from("acme"));
        let schema = context_value("tenant").with_context(vars);
        assert_eq!(schema.call(1).unwrap().value(), Some(&Value::from("acme")));
    }

    #[test]
    fn test_remove_and_transform_if_present() {
        assert_eq!(remove().call(1).unwrap().value(), Some(&Value::Absent));
        let double = transform_if_present(|v| Value::Int(v.as_i64().unwrap_or(0) * 2));
        assert_eq!(double.call(2).unwrap().value(), Some(&Value::Int(4)));
        assert_eq!(double.call(Value::Absent).unwrap().value(), Some(&Value::Absent));
    }

    #[test]
    fn test_check_named() {
        let schema = check_named("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(error_name(&schema.call(1).unwrap()), ".even");
    }
}
