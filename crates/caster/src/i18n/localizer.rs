//! Message lookup.
//!
//! [`Localizer`] is the contract used to turn resolved keys into strings.
//! [`Catalog`] is a simple in-memory implementation backed by a flat key map,
//! loadable from nested JSON, with `%{name}` interpolation.

use std::collections::HashMap;
use std::fmt;

use crate::i18n::Args;

/// Looks up translated messages.
pub trait Localizer: fmt::Debug + Send + Sync {
    /// True if a message exists for `key`.
    fn exists(&self, key: &str) -> bool;

    /// Renders the message for `key`, or a fallback if it is missing.
    fn translate(&self, key: &str, args: &Args) -> String;
}

/// Error loading a [`Catalog`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog root must be a json object")]
    NotAnObject,

    #[error("message `{key}` must be a string")]
    NotAString { key: String },
}

// ============================================================================
// CATALOG
// ============================================================================

const BUILTIN: &[(&str, &str)] = &[
    ("absent", "should be absent"),
    ("any", "should be present"),
    ("array", "should be an array"),
    ("boolean", "is not a boolean"),
    ("check", "is invalid"),
    ("compare", "does not equal %{reference}"),
    ("decimal", "is not a decimal number"),
    ("empty", "should not be empty"),
    ("float", "is not a float"),
    ("hash_value", "is not a hash"),
    ("included_in", "is not included in the list"),
    ("integer", "is not an integer"),
    ("integer32", "is not a 32-bit integer"),
    ("iso8601", "is not a string with ISO-8601 date and time"),
    ("matches", "does not match %{reference}"),
    ("must_be", "is not %{reference}"),
    ("must_be_absent", "must be absent"),
    ("non_empty_string", "should be non-empty string"),
    ("string", "is not a string"),
    ("switch", "is invalid"),
    ("to_boolean", "does not look like a boolean"),
    ("to_float", "does not look like a float"),
    ("to_integer", "does not look like an integer"),
    ("try", "is invalid"),
];

/// In-memory message catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the English messages for `datacaster.errors.*`.
    pub fn builtin() -> Self {
        let messages = BUILTIN
            .iter()
            .map(|(key, message)| (format!("datacaster.errors.{key}"), (*message).to_owned()))
            .collect();
        Self { messages }
    }

    /// Loads a catalog from JSON; nested objects become dotted keys.
    ///
    /// ```rust,ignore
    /// let catalog = Catalog::from_json(r#"{"user": {"name": {"blank": "is required"}}}"#)?;
    /// assert!(catalog.exists("user.name.blank"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let root: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(root) = root else {
            return Err(CatalogError::NotAnObject);
        };
        let mut catalog = Self::new();
        catalog.flatten("", &root)?;
        Ok(catalog)
    }

    fn flatten(
        &mut self,
        prefix: &str,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), CatalogError> {
        for (key, value) in object {
            let full = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                serde_json::Value::String(message) => {
                    self.messages.insert(full, message.clone());
                }
                serde_json::Value::Object(nested) => self.flatten(&full, nested)?,
                _ => return Err(CatalogError::NotAString { key: full }),
            }
        }
        Ok(())
    }

    /// Adds or replaces one message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    /// Adds all messages of `other`, replacing existing ones.
    #[must_use = "builder methods must be chained or built"]
    pub fn merged(mut self, other: Catalog) -> Self {
        self.messages.extend(other.messages);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localizer for Catalog {
    fn exists(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    fn translate(&self, key: &str, args: &Args) -> String {
        match self.messages.get(key) {
            Some(template) => interpolate(template, args),
            None => format!("translation missing: {key}"),
        }
    }
}

/// Replaces `%{name}` placeholders with argument values. Unknown placeholders
/// are left as is.
fn interpolate(template: &str, args: &Args) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match args.get(name) {
                    Some(value) => output.push_str(&value.to_string()),
                    None => {
                        output.push_str("%{");
                        output.push_str(name);
                        output.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_builtin_messages() {
        let catalog = Catalog::builtin();
        assert!(catalog.exists("datacaster.errors.string"));
        assert_eq!(
            catalog.translate("datacaster.errors.string", &Args::new()),
            "is not a string"
        );
    }

    #[test]
    fn test_interpolation() {
        let mut args = Args::new();
        args.insert("reference".into(), Value::from("a hash"));
        assert_eq!(
            Catalog::builtin().translate("datacaster.errors.must_be", &args),
            "is not a hash"
        );
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        assert_eq!(interpolate("min %{n} of %{m}", &Args::new()), "min %{n} of %{m}");
        assert_eq!(interpolate("broken %{n", &Args::new()), "broken %{n");
    }

    #[test]
    fn test_missing_translation_fallback() {
        assert_eq!(
            Catalog::new().translate("a.b", &Args::new()),
            "translation missing: a.b"
        );
    }

    #[test]
    fn test_from_json_flattens() {
        let catalog =
            Catalog::from_json(r#"{"user": {"name": {"blank": "is required"}}, "top": "x"}"#)
                .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.exists("user.name.blank"));
        assert!(catalog.exists("top"));
    }

    #[test]
    fn test_from_json_rejects_non_strings() {
        assert!(matches!(
            Catalog::from_json(r#"{"a": 1}"#),
            Err(CatalogError::NotAString { .. })
        ));
        assert!(matches!(
            Catalog::from_json("[]"),
            Err(CatalogError::NotAnObject)
        ));
    }
}
