//! The store contract every backend implements.

use crate::error::{Error, Result};
use crate::serializer::{from_json, to_json};
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key-value store contract.
///
/// Backends are interchangeable: code written against `dyn KeyValueStore`
/// behaves the same on a [`JsonFileStore`](crate::JsonFileStore) and a
/// [`MemoryStore`](crate::MemoryStore), apart from which values each can
/// persist.
///
/// Every key-taking method rejects an empty key with [`Error::InvalidKey`]
/// before doing anything else.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// The value is validated before the backing storage is touched; a value
    /// the backend can't hold fails with [`Error::UnsupportedValue`].
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Value stored under `key`, or `None`.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Value stored under `key`, or `default`.
    fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Value stored under `key`, or [`Error::NoSuchKey`].
    fn get_or_fail(&self, key: &str) -> Result<Value> {
        self.get(key)?.ok_or_else(|| Error::NoSuchKey(key.to_owned()))
    }

    /// Look up several keys against one snapshot of the store. Results come
    /// back in the order of `keys`.
    fn get_multiple(&self, keys: &[&str]) -> Result<Vec<(String, Option<Value>)>>;

    /// Like [`get_multiple`](Self::get_multiple) with `default` standing in for
    /// missing keys.
    fn get_multiple_or(&self, keys: &[&str], default: Value) -> Result<Vec<(String, Value)>> {
        Ok(self
            .get_multiple(keys)?
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_else(|| default.clone())))
            .collect())
    }

    /// Like [`get_multiple`](Self::get_multiple) but fails with
    /// [`Error::NoSuchKey`] naming the first missing key, in request order.
    ///
    /// Backends whose entries can fail to decode override this so a missing
    /// key is reported before any entry is decoded.
    fn get_multiple_or_fail(&self, keys: &[&str]) -> Result<Vec<(String, Value)>> {
        self.get_multiple(keys)?
            .into_iter()
            .map(|(k, v)| match v {
                Some(v) => Ok((k, v)),
                None => Err(Error::NoSuchKey(k)),
            })
            .collect()
    }

    /// Delete `key`. Returns `false` (and writes nothing) if it wasn't there.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Delete every entry.
    fn clear(&self) -> Result<()>;

    /// `true` if `key` has a value.
    fn exists(&self, key: &str) -> Result<bool>;

    /// All keys, in store order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Number of entries.
    fn count(&self) -> Result<usize>;

    /// Reorder entries by value using [`Value::total_cmp`]. The sort is
    /// stable and the new order is what [`keys`](Self::keys) reports
    /// afterwards.
    fn sort(&self, ascending: bool) -> Result<()>;

    /// Reorder entries by key using [`cmp_keys`](crate::value::cmp_keys).
    fn sort_keys(&self, ascending: bool) -> Result<()>;
}

/// Reject keys the store can't address.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey("keys must not be empty".into()));
    }
    Ok(())
}

/// Store and load any serde type through the [`Value`] domain.
///
/// Implemented for every [`KeyValueStore`], including trait objects.
pub trait TypedStoreExt: KeyValueStore {
    /// Serialize `value` and store it under `key`.
    fn set_typed<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json =
            serde_json::to_value(value).map_err(|e| Error::UnsupportedValue(e.to_string()))?;
        let value = from_json(&json).map_err(Error::UnsupportedValue)?;
        self.set(key, value)
    }

    /// Load the value under `key` and deserialize it as `T`.
    fn get_typed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        let json = to_json(&value).map_err(|e| {
            Error::UnserializationFailed(format!("entry {key:?} has no JSON form: {e}"))
        })?;
        serde_json::from_value(json).map(Some).map_err(|e| {
            Error::UnserializationFailed(format!("entry {key:?} does not match the type: {e}"))
        })
    }
}

impl<S: KeyValueStore + ?Sized> TypedStoreExt for S {}
