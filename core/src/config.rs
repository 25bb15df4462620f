//! API endpoint configuration and its persistence port.
//!
//! The configuration is an explicit value (`ApiConfig`) loaded from and
//! written to a `KeyValueStore` under `STORAGE_KEY`. Nothing here is global:
//! callers pass the store in, and tests use `MemoryStore`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;

/// Fixed key the configuration is stored under.
pub const STORAGE_KEY: &str = "to_do_list_bun";

/// Where the todo API lives and whether that URL passed the probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub is_configured: bool,
}

/// The two states of the configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Unconfigured,
    Configured,
}

impl ApiConfig {
    pub fn configured(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            is_configured: true,
        }
    }

    pub fn state(&self) -> ConfigState {
        if self.is_configured {
            ConfigState::Configured
        } else {
            ConfigState::Unconfigured
        }
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A single JSON file holding a string-to-string map.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), key, "storage entry written");
        Ok(())
    }
}

/// Loads and saves `ApiConfig` through a `KeyValueStore`.
#[derive(Debug)]
pub struct ConfigStore<S> {
    storage: S,
}

impl<S: KeyValueStore> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored configuration, or the unconfigured default when nothing usable
    /// is stored. Only I/O failures are returned as errors.
    pub fn load(&self) -> Result<ApiConfig, StorageError> {
        let Some(raw) = self.storage.get(STORAGE_KEY)? else {
            return Ok(ApiConfig::default());
        };
        match serde_json::from_str(&raw) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(error = %e, "stored API configuration is unreadable, starting unconfigured");
                Ok(ApiConfig::default())
            }
        }
    }

    pub fn save(&self, config: &ApiConfig) -> Result<(), StorageError> {
        let raw = serde_json::to_string(config)?;
        self.storage.set(STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unconfigured() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.state(), ConfigState::Unconfigured);
    }

    #[test]
    fn config_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ApiConfig::configured("http://x/api")).unwrap();
        assert_eq!(json, serde_json::json!({"baseUrl": "http://x/api", "isConfigured": true}));
    }

    #[test]
    fn load_from_empty_store_yields_default() {
        let store = ConfigStore::new(MemoryStore::new());
        assert_eq!(store.load().unwrap(), ApiConfig::default());
    }

    #[test]
    fn save_then_load_returns_the_same_config() {
        let store = ConfigStore::new(MemoryStore::new());
        let config = ApiConfig::configured("http://localhost:3000/api/todos");
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn corrupt_entry_falls_back_to_default() {
        let memory = MemoryStore::new();
        memory.set(STORAGE_KEY, "{not json").unwrap();
        let store = ConfigStore::new(&memory);
        assert_eq!(store.load().unwrap(), ApiConfig::default());
    }

    #[test]
    fn file_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let config = ApiConfig::configured("http://127.0.0.1:3000/api/todos");
        ConfigStore::new(FileStore::new(&path)).save(&config).unwrap();

        let reopened = ConfigStore::new(FileStore::new(&path));
        assert_eq!(reopened.load().unwrap(), config);
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        store.set("other", "value").unwrap();
        store.set(STORAGE_KEY, "{}").unwrap();
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = FileStore::new(&path).get(STORAGE_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
