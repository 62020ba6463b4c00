//! Durable client storage.
//!
//! A small key/value surface modelled on browser `localStorage`: string
//! values under named keys, read back at startup. [`FileStore`] keeps one
//! JSON document per key in the state directory; [`MemoryStore`] backs
//! tests and throwaway sessions.
//!
//! TRADE-OFFS
//! ==========
//! A corrupt persisted document is logged and treated as absent. Losing a
//! saved preference is preferable to refusing to start.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// String key/value storage that survives restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing medium rejects the delete.
    fn remove_item(&self, key: &str) -> Result<(), ApiError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, &e))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ApiError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&path, &e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| storage_error(&tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error(&path, &e))
    }

    fn remove_item(&self, key: &str) -> Result<(), ApiError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, &e)),
        }
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.items().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), ApiError> {
        self.items().remove(key);
        Ok(())
    }
}

/// Load and decode the JSON document stored under `key`.
///
/// A document that fails to decode is logged and reported as absent.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] only when the store itself fails.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, ApiError> {
    let Some(text) = store.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable persisted state");
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`ApiError::Encode`] or [`ApiError::Storage`].
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))?;
    store.set_item(key, &text)
}

fn validate_key(key: &str) -> Result<(), ApiError> {
    let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid { Ok(()) } else { Err(ApiError::Storage(format!("invalid storage key {key:?}"))) }
}

fn storage_error(path: &Path, e: &std::io::Error) -> ApiError {
    ApiError::Storage(format!("{}: {e}", path.display()))
}
