mod config;
pub mod database;
pub mod navigation;
pub mod preferences;

pub use config::Config;
pub use database::{Database, SqliteKv};
pub use navigation::{FullscreenIntent, WeatherCache, WeatherCacheEntry};
pub use preferences::{image_data_url, Background, BackgroundKind, PrefKey, PreferenceStore};

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ConfigError, StorageError};

/// Returns `~/.config/clockroom[-dev]/` based on CLOCKROOM_ENV.
///
/// Set CLOCKROOM_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CLOCKROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("clockroom-dev")
    } else {
        base_dir.join("clockroom")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// String key/value storage, the shape of browser `localStorage` and
/// `sessionStorage`.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-process store. Used by tests and when no database can be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: BTreeMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_store() {
        let mut kv = MemoryKv::new();
        assert!(kv.get("test").unwrap().is_none());
        kv.set("test", "hello").unwrap();
        assert_eq!(kv.get("test").unwrap().as_deref(), Some("hello"));
        kv.remove("test").unwrap();
        assert!(kv.is_empty());
    }
}
