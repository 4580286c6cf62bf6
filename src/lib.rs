//! One key-value contract, several backends, and a crash-safe JSON file store.
//!
//! Write against [`KeyValueStore`] and pick a backend: [`JsonFileStore`]
//! keeps everything in a single JSON file, [`MemoryStore`] keeps it in RAM.
//!
//! ```rust,no_run
//! use json_kv_store::{JsonFileStore, KeyValueStore, Value};
//!
//! let store = JsonFileStore::new("data/db.json");
//! store.set("hello", "world".into()).unwrap();
//! store.set("answer", Value::Int(42)).unwrap();
//! assert_eq!(store.get_or_fail("answer").unwrap(), Value::Int(42));
//! ```
//!
//! Every call on a [`JsonFileStore`] reads the whole file and, if it changed
//! anything, rewrites the whole file. Concurrent handles and processes are
//! kept apart by an advisory lock on a `<file>.lock` sidecar; turn it off
//! with [`JsonFileStoreBuilder::locking`] and the last writer wins.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod persist;
pub mod serializer;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use json_file::{JsonFileStore, JsonFileStoreBuilder, Options};
pub use memory::MemoryStore;
pub use serializer::{JsonSerializer, Serializer, MAX_FLOAT};
pub use store::{KeyValueStore, TypedStoreExt};
pub use value::Value;
