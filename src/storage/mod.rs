//! Storage Module
//!
//! The key/value surface the cache persists into, plus concrete backends.

mod file;
#[cfg(feature = "browser")]
mod local;
mod memory;

pub use file::JsonFileStore;
#[cfg(feature = "browser")]
pub use local::LocalStorage;
pub use memory::MemoryStore;

use crate::error::Result;

// == Key Value Store ==
/// Synchronous string key/value storage.
///
/// Every call either completes immediately or fails with
/// [`CacheError::Storage`](crate::error::CacheError::Storage).
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Returns every key currently stored.
    fn keys(&self) -> Result<Vec<String>>;

    /// Returns true if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
