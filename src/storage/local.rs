//! Browser `window.localStorage` backend.

use tracing::warn;

use super::KeyValueStore;
use crate::error::{CacheError, Result};

fn js_error<E: std::fmt::Debug>(op: &'static str) -> impl FnOnce(E) -> CacheError {
    move |e| CacheError::Storage(format!("localStorage {} failed: {:?}", op, e))
}

// == Local Storage ==
/// Store backed by the page's localStorage.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Binds to `window.localStorage`.
    ///
    /// Fails when there is no window or storage is disabled (e.g. private mode).
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| CacheError::Storage("No window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error("access"))?
            .ok_or_else(|| {
                warn!("localStorage is not available");
                CacheError::Storage("localStorage is not available".to_string())
            })?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error("get"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error("set"))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error("remove"))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let len = self.storage.length().map_err(js_error("length"))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(js_error("key"))? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
