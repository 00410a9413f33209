//! JSON-schema export
//!
//! Every caster can describe the shape it accepts as a [`JsonSchema`]
//! fragment. Composite casters build theirs from their children; fragments
//! describing the same value are combined with [`JsonSchema::apply`].
//!
//! ```rust,ignore
//! let user = hash_schema([("name", string()), ("age", optional(integer()))]);
//! let described = user.json_schema()?.into_value();
//! // {"type": "object", "properties": {...}, "required": ["name"]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::foundation::{Cast, CastResult, Schema, SchemaError};
use crate::runtime::Runtime;
use crate::value::Value;

/// A JSON-schema fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonSchema(Map<String, Json>);

impl JsonSchema {
    /// Empty fragment accepting anything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object() -> Self {
        Self::of_type("object")
    }

    pub fn of_type(json_type: &str) -> Self {
        Self::new().with("type", json_type)
    }

    /// Sets `field`, replacing a previous value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Adds a property schema under `properties`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_property(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        let properties = self
            .0
            .entry("properties")
            .or_insert_with(|| Json::Object(Map::new()));
        if let Json::Object(properties) = properties {
            properties.insert(name.into(), Json::Object(schema.0));
        }
        self
    }

    /// Adds `name` to the `required` list.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        let name = Json::String(name.into());
        let required = self
            .0
            .entry("required")
            .or_insert_with(|| Json::Array(Vec::new()));
        if let Json::Array(required) = required
            && !required.contains(&name)
        {
            required.push(name);
        }
        self
    }

    /// `{"anyOf": [...]}` over the non-empty variants.
    pub fn any_of(variants: impl IntoIterator<Item = JsonSchema>) -> Self {
        Self::combined("anyOf", variants)
    }

    /// `{"oneOf": [...]}` over the non-empty variants.
    pub fn one_of(variants: impl IntoIterator<Item = JsonSchema>) -> Self {
        Self::combined("oneOf", variants)
    }

    fn combined(keyword: &str, variants: impl IntoIterator<Item = JsonSchema>) -> Self {
        let variants: Vec<Json> = variants
            .into_iter()
            .filter(|variant| !variant.is_empty())
            .map(JsonSchema::into_value)
            .collect();
        match variants.len() {
            0 => Self::new(),
            _ => Self::new().with(keyword, variants),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Json> {
        self.0.get(field)
    }

    pub fn into_value(self) -> Json {
        Json::Object(self.0)
    }

    /// Wraps a JSON object; other values yield `None`.
    pub fn from_value(value: Json) -> Option<Self> {
        match value {
            Json::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Merges `other` into `self`, both describing the same value.
    ///
    /// - `required` lists are unioned
    /// - `properties` and `items` merge recursively
    /// - a fragment with `properties` cannot merge with one with `items`
    /// - `description` is taken from `other`
    /// - any other field must be equal on both sides
    ///
    /// # Errors
    ///
    /// [`SchemaError::JsonSchemaConflict`] when the fragments disagree.
    pub fn apply(self, other: JsonSchema) -> Result<JsonSchema, SchemaError> {
        if self.is_empty() {
            return Ok(other);
        }
        if other.is_empty() {
            return Ok(self);
        }
        let mixes = |a: &Self, b: &Self| a.0.contains_key("properties") && b.0.contains_key("items");
        if mixes(&self, &other) || mixes(&other, &self) {
            return Err(conflict("properties", "properties", "items"));
        }

        let mut merged = self.0;
        for (field, right) in other.0 {
            let left = merged.remove(&field);
            let value = match (field.as_str(), left) {
                (_, None) => right,
                ("description", Some(_)) => right,
                ("required", Some(Json::Array(mut left))) => {
                    if let Json::Array(right) = right {
                        for name in right {
                            if !left.contains(&name) {
                                left.push(name);
                            }
                        }
                    }
                    Json::Array(left)
                }
                ("properties", Some(Json::Object(left))) => merge_properties(left, right)?,
                ("items", Some(left)) => merge_fragments(&field, left, right)?,
                (_, Some(left)) if left == right => left,
                (_, Some(left)) => return Err(conflict(&field, &left, &right)),
            };
            merged.insert(field, value);
        }
        Ok(Self(merged))
    }
}

fn conflict(field: &str, left: impl fmt::Display, right: impl fmt::Display) -> SchemaError {
    SchemaError::JsonSchemaConflict {
        field: field.to_owned(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn merge_fragments(field: &str, left: Json, right: Json) -> Result<Json, SchemaError> {
    match (JsonSchema::from_value(left.clone()), JsonSchema::from_value(right.clone())) {
        (Some(left), Some(right)) => Ok(left.apply(right)?.into_value()),
        _ if left == right => Ok(left),
        _ => Err(conflict(field, &left, &right)),
    }
}

fn merge_properties(mut left: Map<String, Json>, right: Json) -> Result<Json, SchemaError> {
    let right = match right {
        Json::Object(right) => right,
        other => return Err(conflict("properties", Json::Object(left), other)),
    };
    for (name, schema) in right {
        let value = match left.remove(&name) {
            Some(existing) => merge_fragments(&name, existing, schema)?,
            None => schema,
        };
        left.insert(name, value);
    }
    Ok(Json::Object(left))
}

impl fmt::Display for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Json::Object(self.0.clone()))
    }
}

// ============================================================================
// ATTRIBUTE OVERRIDE NODE
// ============================================================================

/// Overrides fields of its base's JSON schema; casting is unchanged.
#[derive(Debug, Clone)]
pub struct JsonSchemaAttrs {
    base: Schema,
    attrs: JsonSchema,
}

impl JsonSchemaAttrs {
    pub fn new(base: Schema, attrs: JsonSchema) -> Self {
        Self { base, attrs }
    }
}

impl Cast for JsonSchemaAttrs {
    fn cast(&self, input: Value, rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        self.base.cast(input, rt)
    }

    fn json_schema(&self) -> Result<JsonSchema, SchemaError> {
        let mut schema = self.base.json_schema()?;
        for (field, value) in &self.attrs.0 {
            schema.0.insert(field.clone(), value.clone());
        }
        Ok(schema)
    }

    fn is_optional(&self) -> bool {
        self.base.is_optional()
    }
}

// ============================================================================
// TESTS
// ============================================================================
