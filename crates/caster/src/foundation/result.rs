//! Result of a cast: a valid value or an error tree, never both.

use crate::config;
use crate::foundation::{ErrorTree, SchemaError};
use crate::i18n::Localizer;
use crate::value::Value;

/// Outcome of evaluating a caster.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_caster::prelude::*;
///
/// let result = integer().call(Value::from("nope"))?;
/// assert!(result.is_invalid());
/// assert_eq!(result.errors()?.unwrap().to_json(), json!(["is not an integer"]));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum CastResult<T = Value> {
    Valid(T),
    Invalid(ErrorTree),
}

impl<T> CastResult<T> {
    /// Creates a successful result.
    pub fn valid(value: T) -> Self {
        Self::Valid(value)
    }

    /// Creates a failed result. Scalars are wrapped into a single-item list.
    pub fn invalid(errors: impl Into<ErrorTree>) -> Self {
        Self::Invalid(errors.into())
    }

    /// Rebuilds a successful result from an existing one.
    ///
    /// Fails with [`SchemaError::ResultMismatch`] if `result` is invalid.
    pub fn valid_from(result: CastResult<T>) -> Result<Self, SchemaError> {
        match result {
            valid @ Self::Valid(_) => Ok(valid),
            Self::Invalid(_) => Err(SchemaError::ResultMismatch {
                expected: "valid",
                actual: "invalid",
            }),
        }
    }

    /// Rebuilds a failed result from an existing one.
    ///
    /// Fails with [`SchemaError::ResultMismatch`] if `result` is valid.
    pub fn invalid_from(result: CastResult<T>) -> Result<Self, SchemaError> {
        match result {
            invalid @ Self::Invalid(_) => Ok(invalid),
            Self::Valid(_) => Err(SchemaError::ResultMismatch {
                expected: "invalid",
                actual: "valid",
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the value of a valid result.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// Takes the value, failing with [`SchemaError::UnwrapInvalid`] if invalid.
    pub fn into_value(self) -> Result<T, SchemaError> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(SchemaError::UnwrapInvalid {
                errors: errors.to_string(),
            }),
        }
    }

    /// Returns the value, or `default` if invalid.
    pub fn value_or(self, default: T) -> T {
        match self {
            Self::Valid(value) => value,
            Self::Invalid(_) => default,
        }
    }

    /// Unresolved error tree; `None` when valid.
    pub fn raw_errors(&self) -> Option<&ErrorTree> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    pub fn into_errors(self) -> Option<ErrorTree> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// Error tree resolved with the configured localizer.
    pub fn errors(&self) -> Result<Option<ErrorTree>, SchemaError> {
        self.errors_with(config::localizer().as_ref())
    }

    /// Error tree resolved with an explicit localizer.
    pub fn errors_with(&self, localizer: &dyn Localizer) -> Result<Option<ErrorTree>, SchemaError> {
        self.raw_errors()
            .map(|errors| errors.resolve(localizer))
            .transpose()
    }

    /// Maps the value of a valid result.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CastResult<U> {
        match self {
            Self::Valid(value) => CastResult::Valid(f(value)),
            Self::Invalid(errors) => CastResult::Invalid(errors),
        }
    }

    /// Converts into a std `Result` with the raw error tree.
    pub fn into_std(self) -> Result<T, ErrorTree> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;

    #[test]
    fn test_valid_has_no_errors() {
        let result = CastResult::valid(Value::Int(1));
        assert!(result.is_valid());
        assert!(result.raw_errors().is_none());
        assert_eq!(result.value(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_invalid_wraps_scalar() {
        let result: CastResult = CastResult::invalid("boom");
        assert!(result.is_invalid());
        assert_eq!(result.raw_errors(), Some(&ErrorTree::single("boom")));
        assert!(result.value().is_none());
    }

    #[test]
    fn test_into_value_on_invalid_fails() {
        let result: CastResult = CastResult::invalid("boom");
        let err = result.into_value().unwrap_err();
        assert!(matches!(err, SchemaError::UnwrapInvalid { .. }));
    }

    #[test]
    fn test_valid_from_rejects_invalid() {
        let invalid: CastResult = CastResult::invalid("x");
        assert!(matches!(
            CastResult::valid_from(invalid),
            Err(SchemaError::ResultMismatch { expected: "valid", .. })
        ));

        let valid = CastResult::valid(Value::Null);
        assert!(CastResult::valid_from(valid.clone()).is_ok());
        assert!(CastResult::invalid_from(valid).is_err());
    }

    #[test]
    fn test_errors_with_resolves_messages() {
        let result: CastResult = CastResult::invalid("literal");
        let resolved = result.errors_with(&Catalog::new()).unwrap().unwrap();
        assert_eq!(resolved, ErrorTree::single("literal"));
    }

    #[test]
    fn test_map_and_value_or() {
        let doubled = CastResult::valid(2).map(|n| n * 2);
        assert_eq!(doubled.value_or(0), 4);

        let failed: CastResult<i32> = CastResult::invalid("x");
        assert_eq!(failed.value_or(7), 7);
    }
}
