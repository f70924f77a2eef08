//! Durable key-value backends for the viewed-coins store

use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Backend that keeps one serialized blob per key
///
/// `load` returns `Ok(None)` when nothing was stored under the key yet.
pub trait ViewedPersistence: Send + Sync {
    /// Reads the blob stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the blob stored under `key`
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    /// Creates a backend rooted at `dir`; the directory is created lazily
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ViewedPersistence for JsonFilePersistence {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written blob
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Process-local backend, nothing survives a restart
#[derive(Default)]
pub struct MemoryPersistence {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a blob, e.g. to simulate data left by an earlier session
    pub fn with_blob(key: &str, value: &str) -> Self {
        let persistence = Self::default();
        if let Ok(mut blobs) = persistence.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
        persistence
    }
}

impl ViewedPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self.blobs.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.lock().map_err(|_| StoreError::Poisoned)?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
