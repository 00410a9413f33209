//! Adapter for external rule sets.
//!
//! Any type that reports a list of messages for a value can act as a caster
//! through [`validate`]. An empty list means the value is valid.

use std::fmt;

use crate::foundation::{Cast, CastResult, ErrorItem, ErrorTree, Schema, SchemaError};
use crate::runtime::Runtime;
use crate::value::Value;

/// An external set of rules reporting messages for invalid values.
pub trait RuleSet: Send + Sync {
    fn errors(&self, value: &Value) -> Vec<String>;
}

impl<F> RuleSet for F
where
    F: Fn(&Value) -> Vec<String> + Send + Sync,
{
    fn errors(&self, value: &Value) -> Vec<String> {
        self(value)
    }
}

/// Caster wrapping a [`RuleSet`].
pub struct Validate<R> {
    rules: R,
}

impl<R: RuleSet> Cast for Validate<R> {
    fn cast(&self, input: Value, _rt: &mut Runtime) -> Result<CastResult, SchemaError> {
        let messages = self.rules.errors(&input);
        if messages.is_empty() {
            Ok(CastResult::valid(input))
        } else {
            let items: Vec<ErrorItem> = messages.into_iter().map(ErrorItem::Message).collect();
            Ok(CastResult::invalid(ErrorTree::List(items)))
        }
    }
}

impl<R> fmt::Debug for Validate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validate").finish_non_exhaustive()
    }
}

pub fn validate<R: RuleSet + 'static>(rules: R) -> Schema {
    Schema::new(Validate { rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct MinLength(usize);

    impl RuleSet for MinLength {
        fn errors(&self, value: &Value) -> Vec<String> {
            match value.as_str() {
                Some(s) if s.chars().count() >= self.0 => Vec::new(),
                _ => vec![format!("must be at least {} characters", self.0)],
            }
        }
    }

    #[test]
    fn test_rule_set_messages_become_errors() {
        let schema = validate(MinLength(3));
        assert!(schema.call("abcd").unwrap().is_valid());

        let result = schema.call("ab").unwrap();
        assert_eq!(
            result.raw_errors(),
            Some(&ErrorTree::single("must be at least 3 characters"))
        );
    }

    #[test]
    fn test_closure_rules() {
        let schema = validate(|value: &Value| {
            if value.is_null() {
                vec!["required".to_owned(), "not null".to_owned()]
            } else {
                Vec::new()
            }
        });
        let result = schema.call(Value::Null).unwrap();
        assert_eq!(result.raw_errors().unwrap().items().unwrap().len(), 2);
    }
}
