//! Unified error type for all store operations.
//!
//! The variants are split so callers can tell "my data is bad"
//! ([`UnsupportedValue`](Error::UnsupportedValue),
//! [`UnserializationFailed`](Error::UnserializationFailed)) from "the storage
//! medium failed" ([`Read`](Error::Read), [`Write`](Error::Write)) from "the
//! key isn't there" ([`NoSuchKey`](Error::NoSuchKey)).

use std::path::{Path, PathBuf};

/// Things that can go wrong when using a store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The backing file could not be read, or its contents are not valid JSON.
    #[error("could not read {}: {reason}", .path.display())]
    Read {
        /// File the store tried to read.
        path: PathBuf,
        /// Underlying cause (OS message or JSON syntax error).
        reason: String,
    },
    /// The backing file (or its directory, temp file, or lock) could not be
    /// written.
    #[error("could not write {}: {reason}", .path.display())]
    Write {
        /// File the store tried to write.
        path: PathBuf,
        /// Underlying cause, usually the OS message.
        reason: String,
    },
    /// Stored data is valid JSON but cannot be turned back into a value.
    #[error("unserialization failed: {0}")]
    UnserializationFailed(String),
    /// The value cannot be persisted by this backend.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
    /// An `*_or_fail` lookup hit a missing key.
    #[error("no such key: {0:?}")]
    NoSuchKey(String),
    /// The key is not a valid store key.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl Error {
    pub(crate) fn read(path: &Path, reason: impl ToString) -> Self {
        Error::Read {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, reason: impl ToString) -> Self {
        Error::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Classify a `serde_json` failure that happened while decoding the file
    /// at `path`. Syntax problems are read errors; well-formed JSON with the
    /// wrong shape is an unserialization failure.
    pub(crate) fn from_json(path: &Path, err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Io => Error::read(path, err),
            Category::Syntax | Category::Eof => {
                Error::read(path, format!("JSON syntax error: {err}"))
            }
            Category::Data => Error::UnserializationFailed(format!(
                "{} does not contain a JSON object: {err}",
                path.display()
            )),
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
