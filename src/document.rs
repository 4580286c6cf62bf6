//! The in-memory form of one store file.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Ordered key → stored-entry mapping, loaded for the duration of a single
/// operation.
///
/// Entries stay in their encoded form; they are only decoded for the keys an
/// operation actually looks at, so one bad entry does not poison `keys()` or
/// `count()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: IndexMap<String, JsonValue>,
}

impl Document {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-encoded entries, keeping their order.
    pub fn from_entries(entries: IndexMap<String, JsonValue>) -> Self {
        Self { entries }
    }

    /// Encoded entries in document order.
    pub fn entries(&self) -> &IndexMap<String, JsonValue> {
        &self.entries
    }

    /// Stored entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    /// Insert or overwrite. An overwritten key keeps its position.
    pub fn insert(&mut self, key: String, entry: JsonValue) -> Option<JsonValue> {
        self.entries.insert(key, entry)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    /// `true` if `key` has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stable reorder by `cmp` over (key, entry) pairs.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&String, &JsonValue, &String, &JsonValue) -> Ordering,
    {
        self.entries.sort_by(|ka, va, kb, vb| cmp(ka, va, kb, vb));
    }

    /// Replace the entry order with `order`. Every key in `order` must already
    /// be in the document; keys not listed are dropped.
    pub fn reorder(&mut self, order: &[String]) {
        let mut entries = std::mem::take(&mut self.entries);
        self.entries = order
            .iter()
            .filter_map(|k| entries.swap_remove_entry(k.as_str()))
            .collect();
    }
}
