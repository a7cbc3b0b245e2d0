//! Durable key/value preference storage.

use crate::error::StorageError;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Storage key for the current language code.
pub const LANGUAGE_KEY: &str = "jemt4-language";

/// Storage key for the primary-instrument preference.
pub const INSTRUMENT_KEY: &str = "jemt4-primary-instrument";

/// String preferences that outlive the process. Last write wins.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store, for tests and embedding without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let values = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        debug!("Opened preference store at {}", path.display());

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_error = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content).map_err(io_error)
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== MemoryStore Tests ====================

    #[test]
    fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set(INSTRUMENT_KEY, "guitar").unwrap();
        store.set(INSTRUMENT_KEY, "ukulele").unwrap();

        assert_eq!(store.get(INSTRUMENT_KEY).unwrap().as_deref(), Some("ukulele"));
    }

    // ==================== JsonFileStore Tests ====================

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let temp_dir = TempDir::new().expect("temp dir");
        let store = JsonFileStore::open(temp_dir.path().join("prefs.json")).expect("open");

        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("nested").join("prefs.json");

        {
            let store = JsonFileStore::open(&path).expect("open");
            store.set(LANGUAGE_KEY, "haw").unwrap();
            store.set(INSTRUMENT_KEY, "electricBass").unwrap();
        }

        let reopened = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get(LANGUAGE_KEY).unwrap().as_deref(), Some("haw"));
        assert_eq!(
            reopened.get(INSTRUMENT_KEY).unwrap().as_deref(),
            Some("electricBass")
        );
    }

    #[test]
    fn test_file_store_writes_plain_json_object() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");

        let store = JsonFileStore::open(&path).expect("open");
        store.set(LANGUAGE_KEY, "en").unwrap();

        let content = std::fs::read_to_string(&path).expect("read");
        let json: serde_json::Value = serde_json::from_str(&content).expect("json");
        assert_eq!(json[LANGUAGE_KEY], "en");
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "not json").expect("write");

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
