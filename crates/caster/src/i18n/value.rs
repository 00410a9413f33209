//! Localization values and their composition algebra.
//!
//! Three shapes exist:
//!
//! - [`I18nValue::Key`]: ordered candidate keys, first existing one wins
//! - [`I18nValue::Scope`]: a prefix for relative (dot-leading) keys
//! - [`I18nValue::DefaultKeys`]: legacy form of `Key`
//!
//! Outer nodes compose over inner errors with [`I18nValue::compose`]:
//!
//! | outer \ inner | Key            | DefaultKeys           | Scope |
//! |---------------|----------------|-----------------------|-------|
//! | Key           | outer keys     | outer keys            | error |
//! | DefaultKeys   | error          | outer keys            | error |
//! | Scope         | scoped Key     | scoped DefaultKeys    | error |
//!
//! Arguments merge with the inner ones as base, overridden by the outer ones.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::foundation::{ErrorItem, ErrorTree, SchemaError};
use crate::i18n::Localizer;
use crate::value::Value;

/// Message arguments, interpolated as `%{name}`.
pub type Args = IndexMap<String, Value>;

/// Candidate keys, most preferred first.
pub type Keys = SmallVec<[String; 2]>;

// ============================================================================
// COMPOSE ERROR
// ============================================================================

/// Error returned when two localization values cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ComposeError {
    #[error("cannot compose {outer} over {inner}")]
    Incompatible {
        outer: &'static str,
        inner: &'static str,
    },

    #[error("a scope cannot be resolved to a message, wrap it in a key")]
    UnresolvedScope,
}

// ============================================================================
// I18N VALUE
// ============================================================================

/// A localization value attached to an error.
#[derive(Debug, Clone, PartialEq)]
pub enum I18nValue {
    Key {
        keys: Keys,
        args: Args,
    },
    Scope {
        /// `None` only carries arguments.
        scope: Option<String>,
        /// Hash keys and indices walked below the scope.
        path: Vec<String>,
        args: Args,
    },
    DefaultKeys {
        keys: Keys,
        args: Args,
    },
}

impl I18nValue {
    pub fn key<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Key {
            keys: keys.into_iter().map(Into::into).collect(),
            args: Args::new(),
        }
    }

    pub fn scope(scope: impl Into<String>) -> Self {
        Self::Scope {
            scope: Some(scope.into()),
            path: Vec::new(),
            args: Args::new(),
        }
    }

    /// A scope without prefix: only adds `args`.
    pub fn vars(args: Args) -> Self {
        Self::Scope {
            scope: None,
            path: Vec::new(),
            args,
        }
    }

    pub fn default_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DefaultKeys {
            keys: keys.into_iter().map(Into::into).collect(),
            args: Args::new(),
        }
    }

    /// Adds one argument, replacing an existing one of the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args_mut().insert(name.into(), value.into());
        self
    }

    /// Adds arguments, replacing existing ones of the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args_mut().extend(args);
        self
    }

    pub fn args(&self) -> &Args {
        match self {
            Self::Key { args, .. } | Self::Scope { args, .. } | Self::DefaultKeys { args, .. } => {
                args
            }
        }
    }

    fn args_mut(&mut self) -> &mut Args {
        match self {
            Self::Key { args, .. } | Self::Scope { args, .. } | Self::DefaultKeys { args, .. } => {
                args
            }
        }
    }

    /// Candidate keys; `None` for scopes.
    pub fn keys(&self) -> Option<&[String]> {
        match self {
            Self::Key { keys, .. } | Self::DefaultKeys { keys, .. } => Some(keys),
            Self::Scope { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Key { .. } => "key",
            Self::Scope { .. } => "scope",
            Self::DefaultKeys { .. } => "default_keys",
        }
    }

    // ===== Algebra =====

    /// Composes `self` (outer) over `inner`.
    pub fn compose(&self, inner: &I18nValue) -> Result<I18nValue, ComposeError> {
        match (self, inner) {
            (Self::Key { keys, args }, Self::Key { args: base, .. })
            | (Self::Key { keys, args }, Self::DefaultKeys { args: base, .. }) => Ok(Self::Key {
                keys: keys.clone(),
                args: merge_args(base, args),
            }),
            (Self::DefaultKeys { keys, args }, Self::DefaultKeys { args: base, .. }) => {
                Ok(Self::DefaultKeys {
                    keys: keys.clone(),
                    args: merge_args(base, args),
                })
            }
            (Self::Scope { scope, path, args }, Self::Key { keys, args: base }) => Ok(Self::Key {
                keys: scoped_keys(scope.as_deref(), path, keys),
                args: merge_args(base, args),
            }),
            (Self::Scope { scope, path, args }, Self::DefaultKeys { keys, args: base }) => {
                Ok(Self::DefaultKeys {
                    keys: scoped_keys(scope.as_deref(), path, keys),
                    args: merge_args(base, args),
                })
            }
            (outer, inner) => Err(ComposeError::Incompatible {
                outer: outer.kind(),
                inner: inner.kind(),
            }),
        }
    }

    /// Applies `self` to every error of `tree` it is meant to reach.
    ///
    /// A single-item list always composes. A key leaves larger lists and maps
    /// untouched; a scope descends into them, recording the map keys it walks
    /// through. Literal messages are never changed.
    pub fn apply(&self, tree: ErrorTree) -> Result<ErrorTree, ComposeError> {
        match tree {
            ErrorTree::List(items) if items.len() == 1 => items
                .into_iter()
                .map(|item| self.apply_item(item))
                .collect::<Result<Vec<_>, _>>()
                .map(ErrorTree::List),
            ErrorTree::List(items) => match self {
                Self::Scope { .. } => items
                    .into_iter()
                    .map(|item| self.apply_item(item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(ErrorTree::List),
                Self::Key { .. } | Self::DefaultKeys { .. } => Ok(ErrorTree::List(items)),
            },
            ErrorTree::Map(map) => match self {
                Self::Scope { .. } => map
                    .into_iter()
                    .map(|(key, nested)| {
                        let scoped = self.descend(&key.to_string());
                        Ok((key, scoped.apply(nested)?))
                    })
                    .collect::<Result<IndexMap<_, _>, ComposeError>>()
                    .map(ErrorTree::Map),
                Self::Key { .. } | Self::DefaultKeys { .. } => Ok(ErrorTree::Map(map)),
            },
        }
    }

    fn apply_item(&self, item: ErrorItem) -> Result<ErrorItem, ComposeError> {
        match item {
            ErrorItem::Message(message) => Ok(ErrorItem::Message(message)),
            ErrorItem::I18n(inner) => self.compose(&inner).map(ErrorItem::I18n),
        }
    }

    fn descend(&self, segment: &str) -> I18nValue {
        let mut next = self.clone();
        if let Self::Scope { path, .. } = &mut next {
            path.push(segment.to_owned());
        }
        next
    }

    // ===== Resolution =====

    /// Resolves into a message with `localizer`.
    ///
    /// Relative candidates are skipped. The first existing absolute candidate
    /// is translated; if none exists, the first absolute candidate is
    /// translated anyway so the localizer can render its fallback.
    pub fn resolve(&self, localizer: &dyn Localizer) -> Result<String, SchemaError> {
        let (keys, args) = match self {
            Self::Key { keys, args } | Self::DefaultKeys { keys, args } => (keys, args),
            Self::Scope { .. } => return Err(ComposeError::UnresolvedScope.into()),
        };
        let mut absolute = keys.iter().filter(|key| !key.starts_with('.'));
        let Some(first) = absolute.clone().next() else {
            return Err(SchemaError::Unresolvable {
                candidates: keys.to_vec(),
            });
        };
        let key = absolute
            .find(|key| localizer.exists(key))
            .unwrap_or(first);
        Ok(localizer.translate(key, args))
    }
}

impl fmt::Display for I18nValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { keys, .. } | Self::DefaultKeys { keys, .. } => {
                f.write_str(keys.first().map_or("", String::as_str))
            }
            Self::Scope { scope, .. } => write!(f, "scope({})", scope.as_deref().unwrap_or("")),
        }
    }
}

fn merge_args(base: &Args, overrides: &Args) -> Args {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Expands relative keys into scoped cascades, most specific first, followed
/// by the absolute keys.
fn scoped_keys(scope: Option<&str>, path: &[String], keys: &Keys) -> Keys {
    let Some(scope) = scope else {
        return keys.clone();
    };
    let mut scoped = Keys::new();
    let mut absolute = Keys::new();
    for key in keys {
        match key.strip_prefix('.') {
            Some(relative) => {
                for depth in (0..=path.len()).rev() {
                    let mut candidate = String::from(scope);
                    for segment in &path[..depth] {
                        candidate.push('.');
                        candidate.push_str(segment);
                    }
                    candidate.push('.');
                    candidate.push_str(relative);
                    if !scoped.contains(&candidate) {
                        scoped.push(candidate);
                    }
                }
            }
            None => absolute.push(key.clone()),
        }
    }
    for key in absolute {
        if !scoped.contains(&key) {
            scoped.push(key);
        }
    }
    scoped
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn keys_of(value: &I18nValue) -> Vec<String> {
        value.keys().unwrap().to_vec()
    }

    #[test]
    fn test_scope_over_key() {
        let scope = I18nValue::scope("ns");
        let key = I18nValue::key([".a", "abs.b"]);
        let composed = scope.compose(&key).unwrap();
        assert_eq!(keys_of(&composed), vec!["ns.a", "abs.b"]);
    }

    #[test]
    fn test_scope_cascade_with_path() {
        let scope = I18nValue::scope("ns").descend("user").descend("name");
        let composed = scope
            .compose(&I18nValue::key([".blank", "errors.blank"]))
            .unwrap();
        assert_eq!(
            keys_of(&composed),
            vec!["ns.user.name.blank", "ns.user.blank", "ns.blank", "errors.blank"]
        );
    }

    #[test]
    fn test_key_over_key_left_wins_args_merged() {
        let outer = I18nValue::key(["outer"]).with_arg("a", 1);
        let inner = I18nValue::key(["inner"]).with_arg("a", 0).with_arg("b", 2);
        let composed = outer.compose(&inner).unwrap();

        assert_eq!(keys_of(&composed), vec!["outer"]);
        assert_eq!(composed.args().get("a"), Some(&Value::Int(1)));
        assert_eq!(composed.args().get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_vars_only_merge_args() {
        let vars = I18nValue::vars(Args::from([("n".to_owned(), Value::Int(5))]));
        let composed = vars.compose(&I18nValue::key([".x", "y"])).unwrap();
        assert_eq!(keys_of(&composed), vec![".x", "y"]);
        assert_eq!(composed.args().get("n"), Some(&Value::Int(5)));
    }

    #[rstest]
    #[case(I18nValue::scope("a"), I18nValue::scope("b"))]
    #[case(I18nValue::key(["k"]), I18nValue::scope("b"))]
    #[case(I18nValue::default_keys(["k"]), I18nValue::key(["k"]))]
    fn test_incompatible_compositions(#[case] outer: I18nValue, #[case] inner: I18nValue) {
        assert!(matches!(
            outer.compose(&inner),
            Err(ComposeError::Incompatible { .. })
        ));
    }

    #[test]
    fn test_key_leaves_maps_untouched() {
        let tree = ErrorTree::keyed("a", ErrorTree::single(I18nValue::key(["x"])));
        let applied = I18nValue::key(["y"]).apply(tree.clone()).unwrap();
        assert_eq!(applied, tree);
    }

    #[test]
    fn test_scope_walks_maps() {
        let tree = ErrorTree::keyed("name", ErrorTree::single(I18nValue::key([".blank"])));
        let applied = I18nValue::scope("user").apply(tree).unwrap();
        let item = &applied.get("name").unwrap().items().unwrap()[0];
        let ErrorItem::I18n(value) = item else {
            panic!("expected an i18n item");
        };
        assert_eq!(keys_of(value), vec!["user.name.blank", "user.blank"]);
    }

    #[test]
    fn test_messages_pass_through() {
        let tree = ErrorTree::single("literal");
        let applied = I18nValue::key(["k"]).apply(tree.clone()).unwrap();
        assert_eq!(applied, tree);
    }
}
