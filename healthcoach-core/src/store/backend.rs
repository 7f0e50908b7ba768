//! Raw key-value backends.
//!
//! A backend moves text blobs in and out of durable storage. Typed access,
//! defaults and versioning live in [`DurableStore`](super::DurableStore).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use super::{StoreError, StoreKey};

/// Durable string storage addressed by [`StoreKey`].
pub trait KeyValueBackend {
    /// Reads the blob for `key`. Returns `Ok(None)` when nothing is stored.
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    /// Replaces the blob for `key`.
    fn write(&mut self, key: StoreKey, contents: &str) -> Result<(), StoreError>;

    /// Deletes the blob for `key`. Returns `Ok(false)` if it didn't exist.
    fn remove(&mut self, key: StoreKey) -> Result<bool, StoreError>;
}

/// Stores each key as `<key>.json` in a data directory.
#[derive(Clone, Debug)]
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).exists()
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn write(&mut self, key: StoreKey, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;

        let path = self.path(key);
        fs::write(&path, contents).map_err(|e| StoreError::Io { path, source: e })
    }

    fn remove(&mut self, key: StoreKey) -> Result<bool, StoreError> {
        let path = self.path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }
}

/// In-process backend. Clones share the same entries, so a test can keep a
/// handle while a store owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<HashMap<StoreKey, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw blob stored for `key`.
    pub fn raw(&self, key: StoreKey) -> Option<String> {
        self.entries.borrow().get(&key).cloned()
    }

    /// Stores a raw blob, bypassing any serialization.
    pub fn insert_raw(&self, key: StoreKey, contents: impl Into<String>) {
        self.entries.borrow_mut().insert(key, contents.into());
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn write(&mut self, key: StoreKey, contents: &str) -> Result<(), StoreError> {
        self.insert_raw(key, contents);
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> Result<bool, StoreError> {
        Ok(self.entries.borrow_mut().remove(&key).is_some())
    }
}
