//! JSON file backend, its options, and builder.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::persist::{self, FileLock};
use crate::serializer::{JsonSerializer, Serializer, MAX_FLOAT};
use crate::store::{validate_key, KeyValueStore};
use crate::value::{cmp_keys, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Knobs for a [`JsonFileStore`]. Deserializable so it can live in whatever
/// config file the application already has; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Write indented JSON (default: compact).
    pub pretty: bool,
    /// Store top-level strings in escaped form (default: on).
    pub escape_strings: bool,
    /// Hold an advisory lock on `<file>.lock` for each operation (default: on).
    pub locking: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pretty: false,
            escape_strings: true,
            locking: true,
        }
    }
}

/// Key-value store persisted as a single JSON object in one file.
///
/// Nothing is cached between calls. Each operation loads the whole file,
/// works on it in memory, and (if it changed anything) writes the whole file
/// back through a temp file + rename. A missing file reads as an empty store;
/// the file and its parent directories are created on the first write.
///
/// ```rust,no_run
/// use json_kv_store::{JsonFileStore, KeyValueStore};
///
/// let store = JsonFileStore::new("data/settings.json");
/// store.set("theme", "dark".into()).unwrap();
/// assert_eq!(store.get("theme").unwrap(), Some("dark".into()));
/// ```
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    serializer: JsonSerializer,
    options: Options,
}

impl JsonFileStore {
    /// Largest float magnitude this store accepts.
    pub const MAX_FLOAT: f64 = MAX_FLOAT;

    /// Store at `path` with default [`Options`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::builder(path).build()
    }

    /// Start configuring a store. Call [`.build()`](JsonFileStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::new(path)
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options this store was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    // ---- internal ----

    fn read_lock(&self) -> Option<FileLock> {
        if self.options.locking {
            FileLock::shared(&self.lock_path)
        } else {
            None
        }
    }

    fn write_lock(&self) -> Result<Option<FileLock>> {
        if self.options.locking {
            FileLock::exclusive(&self.lock_path, &self.path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn load(&self) -> Result<Document> {
        let document = match persist::read(&self.path)? {
            Some(bytes) => self.serializer.decode(&self.path, &bytes)?,
            None => Document::new(),
        };
        debug!(path = %self.path.display(), entries = document.len(), "document loaded");
        Ok(document)
    }

    fn save(&self, document: &Document) -> Result<()> {
        let bytes = self.serializer.encode(document)?;
        persist::atomic_write(&self.path, &bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "document written");
        Ok(())
    }

    /// Load under a shared lock and run a query against the document.
    fn query<T>(&self, f: impl FnOnce(&Document) -> Result<T>) -> Result<T> {
        let _lock = self.read_lock();
        let document = self.load()?;
        f(&document)
    }

    /// Load under an exclusive lock, let `f` mutate, and persist when it
    /// reports a change.
    fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> Result<(T, bool)>) -> Result<T> {
        let _lock = self.write_lock()?;
        let mut document = self.load()?;
        let (out, changed) = f(&mut document)?;
        if changed {
            self.save(&document)?;
        }
        Ok(out)
    }

    fn decode(&self, document: &Document, key: &str) -> Result<Option<Value>> {
        document
            .get(key)
            .map(|entry| self.serializer.decode_value(key, entry))
            .transpose()
    }
}

impl KeyValueStore for JsonFileStore {
    fn set(&self, key: &str, value: Value) -> Result<()> {
        validate_key(key)?;
        let entry = self.serializer.encode_value(&value)?;
        self.mutate(|doc| {
            doc.insert(key.to_owned(), entry);
            Ok(((), true))
        })
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        self.query(|doc| self.decode(doc, key))
    }

    fn get_multiple(&self, keys: &[&str]) -> Result<Vec<(String, Option<Value>)>> {
        keys.iter().try_for_each(|k| validate_key(k))?;
        self.query(|doc| {
            keys.iter()
                .map(|k| Ok(((*k).to_owned(), self.decode(doc, k)?)))
                .collect()
        })
    }

    fn get_multiple_or_fail(&self, keys: &[&str]) -> Result<Vec<(String, Value)>> {
        keys.iter().try_for_each(|k| validate_key(k))?;
        self.query(|doc| {
            if let Some(missing) = keys.iter().find(|k| !doc.contains_key(k)) {
                return Err(Error::NoSuchKey((*missing).to_owned()));
            }
            keys.iter()
                .map(|k| {
                    let entry = doc.get(k).ok_or_else(|| Error::NoSuchKey((*k).to_owned()))?;
                    Ok(((*k).to_owned(), self.serializer.decode_value(k, entry)?))
                })
                .collect()
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        // Absent keys are answered from a read so no lock file or directory
        // gets created.
        if !self.query(|doc| Ok(doc.contains_key(key)))? {
            debug!(path = %self.path.display(), key, "nothing to remove");
            return Ok(false);
        }
        self.mutate(|doc| {
            let removed = doc.remove(key).is_some();
            Ok((removed, removed))
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(|doc| {
            doc.clear();
            Ok(((), true))
        })
    }

    fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        self.query(|doc| Ok(doc.contains_key(key)))
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.query(|doc| Ok(doc.keys().cloned().collect()))
    }

    fn count(&self) -> Result<usize> {
        self.query(|doc| Ok(doc.len()))
    }

    fn sort(&self, ascending: bool) -> Result<()> {
        self.mutate(|doc| {
            let snapshot: &Document = doc;
            let mut decoded = snapshot
                .keys()
                .map(|k| Ok((k.clone(), self.decode(snapshot, k)?.unwrap_or(Value::Null))))
                .collect::<Result<Vec<_>>>()?;
            decoded.sort_by(|(_, a), (_, b)| {
                let ord = a.total_cmp(b);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
            let order: Vec<String> = decoded.into_iter().map(|(k, _)| k).collect();
            doc.reorder(&order);
            Ok(((), true))
        })
    }

    fn sort_keys(&self, ascending: bool) -> Result<()> {
        self.mutate(|doc| {
            doc.sort_by(|ka, _, kb, _| {
                let ord = cmp_keys(ka, kb);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
            Ok(((), true))
        })
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a [`JsonFileStore`].
///
/// ```rust,no_run
/// use json_kv_store::JsonFileStore;
///
/// let store = JsonFileStore::builder("db.json")
///     .pretty(true)
///     .locking(false)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStoreBuilder {
    path: PathBuf,
    options: Options,
}

impl JsonFileStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options: Options::default(),
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.options.pretty = yes;
        self
    }

    /// Escape top-level string values (default: on). Turn off to read files
    /// written by tools that store plain JSON strings.
    pub fn escape_strings(mut self, yes: bool) -> Self {
        self.options.escape_strings = yes;
        self
    }

    /// Serialize operations across handles and processes with an advisory
    /// lock on `<file>.lock` (default: on).
    pub fn locking(mut self, yes: bool) -> Self {
        self.options.locking = yes;
        self
    }

    /// Create the store. Nothing touches the disk until the first operation.
    pub fn build(self) -> JsonFileStore {
        let serializer = JsonSerializer::new()
            .pretty(self.options.pretty)
            .escape_strings(self.options.escape_strings);
        JsonFileStore {
            lock_path: persist::lock_path(&self.path),
            path: self.path,
            serializer,
            options: self.options,
        }
    }
}
