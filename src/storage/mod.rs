//! Persisted state.
//!
//! A tiny key/value abstraction over wherever history and settings live
//! between sessions, plus typed load/save helpers on top of it.

pub mod persisted;

use crate::model::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;

pub use persisted::{load_history, load_settings, save_history, save_settings};

/// Storage key for the query history.
pub const HISTORY_KEY: &str = "hexgrid.history";
/// Storage key for the settings panel.
pub const SETTINGS_KEY: &str = "hexgrid.settings";

/// String key/value store.
pub trait Storage {
    /// Read a value. A key that was never written is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Resolve the default storage directory.
///
/// Returns `~/.local/share/hexgrid` on Linux, the platform data directory
/// elsewhere, or `./hexgrid-data` when none can be determined.
pub fn default_storage_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("hexgrid"),
        None => PathBuf::from("hexgrid-data"),
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_error)?;
        std::fs::write(self.path_for(key), value).map_err(io_error)
    }
}

/// In-process store, used by tests and when persistence is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }

    /// Raw value for assertions.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hexgrid-storage-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_storage_missing_key_is_none() {
        let storage = FileStorage::new(temp_dir("missing"));
        assert!(storage.load("nope").unwrap().is_none());
    }

    #[test]
    fn file_storage_roundtrip_creates_directory() {
        let dir = temp_dir("roundtrip");
        let mut storage = FileStorage::new(dir.join("nested"));
        storage.save(HISTORY_KEY, "[]").unwrap();
        assert_eq!(storage.load(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
        assert!(storage.path_for(HISTORY_KEY).ends_with("hexgrid.history.json"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        storage.save(SETTINGS_KEY, "{}").unwrap();
        assert_eq!(storage.get(SETTINGS_KEY), Some("{}"));
    }

    #[test]
    fn default_storage_dir_names_app() {
        let dir = default_storage_dir();
        assert!(dir.to_string_lossy().contains("hexgrid"));
    }
}
