//! In-memory backend.

use crate::error::Result;
use crate::store::{validate_key, KeyValueStore};
use crate::value::{cmp_keys, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;

/// Volatile store behind a `parking_lot::RwLock`.
///
/// Same contract and ordering rules as [`JsonFileStore`](crate::JsonFileStore),
/// but it keeps any [`Value`] as-is, binary data and huge floats included.
/// Handy for tests and as a drop-in when persistence isn't needed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<IndexMap<String, Value>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: Value) -> Result<()> {
        validate_key(key)?;
        self.entries.write().insert(key.to_owned(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn get_multiple(&self, keys: &[&str]) -> Result<Vec<(String, Option<Value>)>> {
        keys.iter().try_for_each(|k| validate_key(k))?;
        let entries = self.entries.read();
        Ok(keys
            .iter()
            .map(|k| ((*k).to_owned(), entries.get(*k).cloned()))
            .collect())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.write().shift_remove(key).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.entries.read().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    fn sort(&self, ascending: bool) -> Result<()> {
        self.entries.write().sort_by(|_, a, _, b| {
            let ord = a.total_cmp(b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(())
    }

    fn sort_keys(&self, ascending: bool) -> Result<()> {
        self.entries.write().sort_by(|a, _, b, _| {
            let ord = cmp_keys(a, b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(())
    }
}
