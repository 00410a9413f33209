//! Error trees
//!
//! Every failure carries an [`ErrorTree`]: either a flat list of error items
//! or a map from hash keys / array indices to nested trees. A scalar error is
//! always wrapped into a single-item list.
//!
//! [`merge_errors`] combines two trees: lists are unioned, maps are merged
//! key-wise, and a list meeting a map is folded under [`ErrorKey::Base`].

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::foundation::SchemaError;
use crate::i18n::{I18nValue, Localizer};

// ============================================================================
// KEYS AND ITEMS
// ============================================================================

/// A key inside an error map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Errors that belong to the value as a whole, not to one of its keys.
    Base,
    /// Hash key.
    Name(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ErrorKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ErrorKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single error: a literal message or an unresolved localization value.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorItem {
    Message(String),
    I18n(I18nValue),
}

impl ErrorItem {
    /// Resolves the item into a literal message.
    pub fn resolve(&self, localizer: &dyn Localizer) -> Result<String, SchemaError> {
        match self {
            Self::Message(message) => Ok(message.clone()),
            Self::I18n(value) => value.resolve(localizer),
        }
    }
}

impl fmt::Display for ErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::I18n(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ErrorItem {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

impl From<String> for ErrorItem {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<I18nValue> for ErrorItem {
    fn from(value: I18nValue) -> Self {
        Self::I18n(value)
    }
}

// ============================================================================
// ERROR TREE
// ============================================================================

/// Recursive list-or-map of errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    List(Vec<ErrorItem>),
    Map(IndexMap<ErrorKey, ErrorTree>),
}

impl Default for ErrorTree {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ErrorTree {
    /// Creates an empty map.
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Creates a single-item list.
    pub fn single(item: impl Into<ErrorItem>) -> Self {
        Self::List(vec![item.into()])
    }

    /// Creates a map with one nested tree.
    pub fn keyed(key: impl Into<ErrorKey>, tree: impl Into<ErrorTree>) -> Self {
        let mut map = IndexMap::new();
        map.insert(key.into(), tree.into());
        Self::Map(map)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the items of a list tree.
    pub fn items(&self) -> Option<&[ErrorItem]> {
        match self {
            Self::List(items) => Some(items),
            Self::Map(_) => None,
        }
    }

    /// Looks up a nested tree of a map.
    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&ErrorTree> {
        match self {
            Self::List(_) => None,
            Self::Map(map) => map.get(&key.into()),
        }
    }

    /// Adds a nested tree under `key`, merging with what is already there.
    ///
    /// A list tree is first turned into a map with the list under `Base`.
    pub fn insert(&mut self, key: impl Into<ErrorKey>, tree: ErrorTree) {
        let current = std::mem::take(self);
        *self = current.merge(Self::keyed(key, tree));
    }

    /// Merges two trees. See [`merge_errors`].
    pub fn merge(self, other: ErrorTree) -> ErrorTree {
        match (self, other) {
            (Self::List(mut left), Self::List(right)) => {
                for item in right {
                    if !left.contains(&item) {
                        left.push(item);
                    }
                }
                Self::List(left)
            }
            (Self::Map(mut left), Self::Map(right)) => {
                for (key, tree) in right {
                    match left.entry(key) {
                        Entry::Occupied(mut slot) => {
                            let existing = std::mem::take(slot.get_mut());
                            *slot.get_mut() = existing.merge(tree);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(tree);
                        }
                    }
                }
                Self::Map(left)
            }
            (list @ Self::List(_), map @ Self::Map(_)) => {
                Self::keyed(ErrorKey::Base, list).merge(map)
            }
            (map @ Self::Map(_), list @ Self::List(_)) => {
                map.merge(Self::keyed(ErrorKey::Base, list))
            }
        }
    }

    /// Resolves every localization value into a literal message.
    pub fn resolve(&self, localizer: &dyn Localizer) -> Result<ErrorTree, SchemaError> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|item| item.resolve(localizer).map(ErrorItem::Message))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Self::Map(map) => map
                .iter()
                .map(|(key, tree)| Ok((key.clone(), tree.resolve(localizer)?)))
                .collect::<Result<IndexMap<_, _>, SchemaError>>()
                .map(Self::Map),
        }
    }

    /// Converts into JSON: lists become arrays of strings, maps objects.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::List(items) => items
                .iter()
                .map(|item| serde_json::Value::String(item.to_string()))
                .collect(),
            Self::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, tree)| (key.to_string(), tree.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for ErrorTree {
    fn from(message: &str) -> Self {
        Self::single(message)
    }
}

impl From<String> for ErrorTree {
    fn from(message: String) -> Self {
        Self::single(message)
    }
}

impl From<ErrorItem> for ErrorTree {
    fn from(item: ErrorItem) -> Self {
        Self::single(item)
    }
}

impl From<I18nValue> for ErrorTree {
    fn from(value: I18nValue) -> Self {
        Self::single(value)
    }
}

impl From<Vec<ErrorItem>> for ErrorTree {
    fn from(items: Vec<ErrorItem>) -> Self {
        Self::List(items)
    }
}

impl From<IndexMap<ErrorKey, ErrorTree>> for ErrorTree {
    fn from(map: IndexMap<ErrorKey, ErrorTree>) -> Self {
        Self::Map(map)
    }
}

/// Merges two optional error trees.
///
/// - both `None`: an empty list
/// - one `None`: the other tree
/// - list and list: ordered union, duplicates dropped
/// - map and map: key-wise recursive merge
/// - list and map: the list is merged under [`ErrorKey::Base`]
pub fn merge_errors(left: Option<ErrorTree>, right: Option<ErrorTree>) -> ErrorTree {
    match (left, right) {
        (None, None) => ErrorTree::default(),
        (Some(tree), None) | (None, Some(tree)) => tree,
        (Some(left), Some(right)) => left.merge(right),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn list(items: &[&str]) -> ErrorTree {
        ErrorTree::List(items.iter().map(|s| ErrorItem::from(*s)).collect())
    }

    #[test]
    fn test_merge_both_none_is_empty_list() {
        assert_eq!(merge_errors(None, None), ErrorTree::List(vec![]));
    }

    #[test]
    fn test_merge_one_side_none() {
        assert_eq!(merge_errors(Some(list(&["a"])), None), list(&["a"]));
        assert_eq!(merge_errors(None, Some(list(&["b"]))), list(&["b"]));
    }

    #[test]
    fn test_merge_lists_is_union() {
        let merged = merge_errors(Some(list(&["a", "b"])), Some(list(&["b", "c"])));
        assert_eq!(merged, list(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_maps_recursively() {
        let left = ErrorTree::keyed("a", list(&["x"]));
        let mut right = ErrorTree::keyed("a", list(&["y"]));
        right.insert("b", list(&["z"]));

        let merged = merge_errors(Some(left), Some(right));
        assert_eq!(merged.to_json(), json!({"a": ["x", "y"], "b": ["z"]}));
    }

    #[test]
    fn test_merge_list_into_map_under_base() {
        let map = ErrorTree::keyed("a", list(&["x"]));
        let merged = merge_errors(Some(list(&["whole"])), Some(map));
        assert_eq!(merged.to_json(), json!({"base": ["whole"], "a": ["x"]}));
    }

    #[test]
    fn test_merge_list_into_existing_base() {
        let mut map = ErrorTree::keyed(ErrorKey::Base, list(&["one"]));
        map.insert("a", list(&["x"]));
        let merged = merge_errors(Some(map), Some(list(&["two"])));
        assert_eq!(merged.get(ErrorKey::Base), Some(&list(&["one", "two"])));
    }

    #[test]
    fn test_insert_on_list_folds_under_base() {
        let mut tree = list(&["whole"]);
        tree.insert(1usize, list(&["bad"]));
        assert_eq!(tree.to_json(), json!({"base": ["whole"], "1": ["bad"]}));
    }
}
