//! Checked-key bookkeeping for the structure cleaner.
//!
//! [`StructureTracker`] keeps a stack of levels mirroring the path into the
//! value being cast. Entering a key pushes a level; leaving it records the
//! key in the parent level: as [`CheckedSchema::Full`] when nothing below it
//! asked for per-child tracking, or as the partial record built below it
//! otherwise.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::foundation::ErrorKey;
use crate::runtime::{ContextFrame, KeyTracker};

// ============================================================================
// PATH KEYS AND RECORDS
// ============================================================================

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    Name(String),
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<PathKey> for ErrorKey {
    fn from(key: PathKey) -> Self {
        match key {
            PathKey::Name(name) => Self::Name(name),
            PathKey::Index(index) => Self::Index(index),
        }
    }
}

/// Which parts of a value were checked.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckedSchema {
    /// The whole value passes through as is.
    Full,
    /// Only the listed children were checked.
    Partial(IndexMap<PathKey, CheckedSchema>),
    /// Nothing is known yet.
    #[default]
    Unknown,
}

impl CheckedSchema {
    pub fn partial() -> Self {
        Self::Partial(IndexMap::new())
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Record of a child, if it was checked.
    pub fn get(&self, key: &PathKey) -> Option<&CheckedSchema> {
        match self {
            Self::Partial(children) => children.get(key),
            Self::Full | Self::Unknown => None,
        }
    }

    /// Merges two records. `Full` absorbs everything.
    pub fn merge(self, other: CheckedSchema) -> CheckedSchema {
        match (self, other) {
            (Self::Full, _) | (_, Self::Full) => Self::Full,
            (Self::Unknown, other) => other,
            (this, Self::Unknown) => this,
            (Self::Partial(mut left), Self::Partial(right)) => {
                for (key, record) in right {
                    insert_merged(&mut left, key, record);
                }
                Self::Partial(left)
            }
        }
    }

    fn insert(&mut self, key: PathKey, record: CheckedSchema) {
        match self {
            Self::Full => {}
            Self::Unknown => {
                let mut children = IndexMap::new();
                children.insert(key, record);
                *self = Self::Partial(children);
            }
            Self::Partial(children) => insert_merged(children, key, record),
        }
    }
}

fn insert_merged(children: &mut IndexMap<PathKey, CheckedSchema>, key: PathKey, record: CheckedSchema) {
    match children.entry(key) {
        Entry::Occupied(mut slot) => {
            let existing = std::mem::take(slot.get_mut());
            *slot.get_mut() = existing.merge(record);
        }
        Entry::Vacant(slot) => {
            slot.insert(record);
        }
    }
}

// ============================================================================
// STRUCTURE TRACKER FRAME
// ============================================================================

#[derive(Debug, Default)]
struct Level {
    key: Option<PathKey>,
    should_check: bool,
    ignored: bool,
    record: CheckedSchema,
}

/// Context frame recording checked keys for one structure cleaner.
#[derive(Debug)]
pub struct StructureTracker {
    levels: Vec<Level>,
    ignoring: bool,
}

impl Default for StructureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureTracker {
    pub fn new() -> Self {
        Self {
            levels: vec![Level::default()],
            ignoring: false,
        }
    }

    /// True if the root level never asked for per-child tracking.
    pub fn unchecked(&self) -> bool {
        self.levels.first().is_none_or(|root| !root.should_check)
    }

    /// Consumes the tracker, returning the record of the root level.
    ///
    /// An unchecked root yields [`CheckedSchema::Full`].
    pub fn into_record(self) -> CheckedSchema {
        match self.levels.into_iter().next() {
            Some(root) if root.should_check => match root.record {
                CheckedSchema::Unknown => CheckedSchema::partial(),
                record => record,
            },
            _ => CheckedSchema::Full,
        }
    }

    fn current(&mut self) -> Option<&mut Level> {
        self.levels.last_mut()
    }
}

impl KeyTracker for StructureTracker {
    fn enter_key(&mut self, key: PathKey) {
        self.levels.push(Level {
            key: Some(key),
            ignored: self.ignoring,
            ..Level::default()
        });
    }

    fn leave_key(&mut self) {
        // the root level is never popped
        if self.levels.len() < 2 {
            return;
        }
        let Some(level) = self.levels.pop() else {
            return;
        };
        if level.ignored {
            return;
        }
        let Some(key) = level.key else {
            return;
        };
        let record = if level.should_check {
            match level.record {
                CheckedSchema::Unknown => CheckedSchema::partial(),
                record => record,
            }
        } else {
            CheckedSchema::Full
        };
        if let Some(parent) = self.current() {
            parent.record.insert(key, record);
        }
    }

    fn will_check(&mut self) {
        if let Some(level) = self.current() {
            level.should_check = true;
        }
    }

    fn merge_checked(&mut self, record: CheckedSchema) {
        if let Some(level) = self.current() {
            level.should_check = true;
            let existing = std::mem::take(&mut level.record);
            level.record = existing.merge(record);
        }
    }

    fn set_ignoring(&mut self, ignoring: bool) -> bool {
        std::mem::replace(&mut self.ignoring, ignoring)
    }
}

impl ContextFrame for StructureTracker {
    fn as_key_tracker(&mut self) -> Option<&mut dyn KeyTracker> {
        Some(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
