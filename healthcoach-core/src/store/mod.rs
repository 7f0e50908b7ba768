//! Durable key-value store adapter.
//!
//! Every persisted value is a JSON blob under one of the [`StoreKey`]s. Values
//! are written inside a version envelope:
//!
//! ```text
//! {"version": 1, "data": <value>}
//! ```
//!
//! Reads accept both the envelope and a bare value written before the
//! envelope existed. Reads never fail: a missing, unreadable or malformed blob
//! logs a warning and yields the caller's default. Writes go straight to the
//! backend and then to the in-memory mirror, and report failures.

mod backend;
mod key;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use key::StoreKey;

/// Version written into every envelope.
pub const SCHEMA_VERSION: u64 = 1;

/// Errors that can occur while writing to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("Failed to encode value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Typed access to a [`KeyValueBackend`] with an in-memory mirror.
pub struct DurableStore {
    backend: Box<dyn KeyValueBackend>,
    mirror: HashMap<StoreKey, Value>,
}

impl DurableStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            mirror: HashMap::new(),
        }
    }

    /// Store backed by `<data_dir>/<key>.json` files.
    pub fn open_dir(data_dir: PathBuf) -> Self {
        Self::new(FileBackend::new(data_dir))
    }

    /// Store that only lives in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Returns the value stored under `key`, or `default` if it is absent or
    /// cannot be decoded as `T`.
    pub fn get<T: DeserializeOwned>(&mut self, key: StoreKey, default: T) -> T {
        let value = match self.mirror.get(&key) {
            Some(value) => value.clone(),
            None => match self.load_value(key) {
                Some(value) => {
                    self.mirror.insert(key, value.clone());
                    value
                }
                None => return default,
            },
        };

        match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(%key, error = %e, "stored value has an unexpected shape, using default");
                default
            }
        }
    }

    /// Like [`get`](Self::get) with `T::default()` as the fallback.
    pub fn get_or_default<T: DeserializeOwned + Default>(&mut self, key: StoreKey) -> T {
        self.get(key, T::default())
    }

    /// Writes `value` under `key` and mirrors it in memory.
    ///
    /// The mirror is only updated once the backend write succeeded.
    pub fn set<T: Serialize>(&mut self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_value(value)?;
        let envelope = json!({ "version": SCHEMA_VERSION, "data": &data });
        let contents = serde_json::to_string(&envelope)?;

        self.backend.write(key, &contents)?;
        self.mirror.insert(key, data);
        tracing::debug!(%key, bytes = contents.len(), "stored value");

        Ok(())
    }

    /// Deletes the value stored under `key`.
    pub fn remove(&mut self, key: StoreKey) -> Result<(), StoreError> {
        self.backend.remove(key)?;
        self.mirror.remove(&key);
        Ok(())
    }

    fn load_value(&self, key: StoreKey) -> Option<Value> {
        let contents = match self.backend.read(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to read stored value, using default");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => Some(unwrap_envelope(key, value)),
            Err(e) => {
                tracing::warn!(%key, error = %e, "stored value is not valid JSON, using default");
                None
            }
        }
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("mirrored", &self.mirror.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Strips the version envelope. Bare values pass through unchanged.
fn unwrap_envelope(key: StoreKey, value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.len() == 2 && map.contains_key("version") && map.contains_key("data") =>
        {
            let version = map.get("version").and_then(Value::as_u64);
            if version.map_or(true, |v| v > SCHEMA_VERSION) {
                tracing::warn!(%key, ?version, "stored value has an unknown schema version");
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
