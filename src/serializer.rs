//! Serialization layer: documents and values to/from JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different textual format.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Largest float magnitude the JSON file store accepts. Anything up to this
/// survives a write/read cycle through the textual encoding unchanged.
pub const MAX_FLOAT: f64 = 1.0e14;

/// Converts documents and individual values to/from their stored form.
pub trait Serializer: Send + Sync {
    /// Encode a whole document to bytes.
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;

    /// Decode bytes read from `path` into a document. Empty input is an empty
    /// document.
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Document>;

    /// Turn a value into its stored entry, rejecting anything the format
    /// cannot hold.
    fn encode_value(&self, value: &Value) -> Result<JsonValue>;

    /// Turn the stored entry for `key` back into a value.
    fn decode_value(&self, key: &str, entry: &JsonValue) -> Result<Value>;
}

/// JSON serializer with optional pretty-printing and top-level string
/// escaping.
///
/// With escaping on (the default), a string value is stored as its own JSON
/// encoding wrapped in a JSON string: `"bar"` lands on disk as `"\"bar\""`.
/// A stored string that isn't in that form fails to decode with
/// [`Error::UnserializationFailed`].
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    pretty: bool,
    escape_strings: bool,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self {
            pretty: false,
            escape_strings: true,
        }
    }
}

impl JsonSerializer {
    /// Compact JSON with string escaping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle pretty-printed output.
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Toggle escaping of top-level string values.
    pub fn escape_strings(mut self, yes: bool) -> Self {
        self.escape_strings = yes;
        self
    }
}

impl Serializer for JsonSerializer {
    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document.entries())
        } else {
            serde_json::to_vec(document.entries())
        };
        bytes.map_err(|e| Error::UnsupportedValue(e.to_string()))
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Document> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }
        let entries: IndexMap<String, JsonValue> =
            serde_json::from_slice(bytes).map_err(|e| Error::from_json(path, e))?;
        Ok(Document::from_entries(entries))
    }

    fn encode_value(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::String(s) if self.escape_strings => {
                let quoted = serde_json::to_string(s)
                    .map_err(|e| Error::UnsupportedValue(e.to_string()))?;
                Ok(JsonValue::String(quoted))
            }
            other => to_json(other),
        }
    }

    fn decode_value(&self, key: &str, entry: &JsonValue) -> Result<Value> {
        match entry {
            JsonValue::String(raw) if self.escape_strings => serde_json::from_str::<String>(raw)
                .map(Value::String)
                .map_err(|e| {
                    Error::UnserializationFailed(format!(
                        "entry {key:?} is not an escaped string: {e}"
                    ))
                }),
            other => from_json(other).map_err(|reason| {
                Error::UnserializationFailed(format!("entry {key:?}: {reason}"))
            }),
        }
    }
}

/// Convert a value to plain JSON, enforcing the JSON value domain: no binary
/// data, finite floats no larger than [`MAX_FLOAT`].
pub fn to_json(value: &Value) -> Result<JsonValue> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(Error::UnsupportedValue(format!(
                    "cannot store non-finite float {f} as JSON"
                )));
            }
            if f.abs() > MAX_FLOAT {
                return Err(Error::UnsupportedValue(format!(
                    "cannot store float {f:e} as JSON: magnitude exceeds {MAX_FLOAT:e}"
                )));
            }
            serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| Error::UnsupportedValue(format!("cannot store float {f}")))?
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => {
            JsonValue::Array(items.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), to_json(v)?)))
                .collect::<Result<_>>()?,
        ),
        Value::Binary(bytes) => {
            return Err(Error::UnsupportedValue(format!(
                "cannot store {} bytes of binary data as JSON",
                bytes.len()
            )))
        }
    })
}

/// Convert plain JSON back into a value. Fails only on integers outside the
/// `i64` range.
pub fn from_json(json: &JsonValue) -> std::result::Result<Value, String> {
    Ok(match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if n.is_f64() {
                Value::Float(n.as_f64().unwrap_or_default())
            } else {
                return Err(format!("integer {n} is out of range"));
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => {
            Value::Array(items.iter().map(from_json).collect::<std::result::Result<_, _>>()?)
        }
        JsonValue::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_json(v)?)))
                .collect::<std::result::Result<_, String>>()?,
        ),
    })
}
