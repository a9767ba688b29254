//! File-backed store
//!
//! Persists all records as a single JSON object, rewritten on every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{CacheError, Result};

// == JSON File Store ==
/// Durable store kept in one JSON file of string to string.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    // == Constructor ==
    /// Opens the store at `path`, loading existing records.
    ///
    /// A missing file yields an empty store; the file is created on first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CacheError::Storage(format!("Corrupt store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), records = entries.len(), "Opened file store");
        Ok(Self { path, entries })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Flush ==
    /// Rewrites the file through a sibling temp file and a rename.
    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Puts `key` back to `previous` after a failed flush, so memory matches the file.
    fn restore(&mut self, key: &str, previous: Option<String>) {
        warn!("Flush to {} failed; reverting key {}", self.path.display(), key);
        match previous {
            Some(value) => self.entries.insert(key.to_string(), value),
            None => self.entries.remove(key),
        };
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            self.restore(key, previous);
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(previous) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.restore(key, Some(previous));
                return Err(e);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set("app-user", "alice").unwrap();
            store.set("app-user-expiration", "1000").unwrap();
            store.remove("app-user-expiration").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("app-user").unwrap().as_deref(), Some("alice"));
        assert_eq!(store.keys().unwrap(), vec!["app-user"]);
    }

    #[test]
    fn test_file_store_failed_set_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("missing-dir").join("cache.json")).unwrap();

        let result = store.set("k", "v");
        assert!(matches!(result, Err(CacheError::Storage(_))));
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_failed_remove_keeps_value() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let mut store = JsonFileStore::open(sub.join("cache.json")).unwrap();
        store.set("k", "v").unwrap();

        fs::remove_dir_all(&sub).unwrap();

        assert!(store.remove("k").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(CacheError::Storage(_))));
    }
}
