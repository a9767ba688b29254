//! Cache Store Module
//!
//! Main cache engine: key namespacing and lazy TTL expiration on top of an
//! injected [`KeyValueStore`] and [`Clock`].
//!
//! A logical entry occupies two independent records (value and expiration).
//! They are written and removed with separate store calls, so a failure
//! between the two calls can leave one without the other.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::entry::{self, StorageKeys, EXPIRATION_SUFFIX, PREFIX_SEPARATOR};
use crate::cache::CacheStats;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

// == Cache ==
/// Namespaced, optionally-expiring key/value cache.
#[derive(Debug)]
pub struct Cache<S, C = SystemClock> {
    /// Backing record storage
    store: S,
    /// Time source for expiration
    clock: C,
    /// Namespace prefix, None = no namespacing
    prefix: Option<String>,
    /// Read statistics
    stats: CacheStats,
}

impl<S: KeyValueStore> Cache<S, SystemClock> {
    // == Constructor ==
    /// Creates a cache over `store` using wall-clock time and no prefix.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Cache<S, C> {
    /// Creates a cache over `store` reading time from `clock`.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            prefix: None,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache configured from `config`.
    pub fn from_config(store: S, clock: C, config: &CacheConfig) -> Self {
        let mut cache = Self::with_clock(store, clock);
        cache.prefix = config.prefix.clone();
        cache
    }

    // == Prefix ==
    /// Sets the namespace prefix for all subsequent key derivations.
    ///
    /// No validation is performed; any previous prefix is replaced.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    /// Returns the current namespace prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the storage key of the value record for `key`.
    pub fn derive_key(&self, key: &str) -> String {
        entry::derive_key(self.prefix(), key)
    }

    /// Returns the storage key of the expiration record for `key`.
    pub fn derive_expiration_key(&self, key: &str) -> String {
        self.keys_for(key).expiration
    }

    fn keys_for(&self, key: &str) -> StorageKeys {
        StorageKeys::derive(self.prefix(), key)
    }

    // == Exists ==
    /// Returns true if a value record exists for `key`.
    ///
    /// Expiration is not consulted.
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.store.contains(&self.derive_key(key))
    }

    // == Clear ==
    /// Removes the expiration record and the value record for `key`.
    ///
    /// Clearing an absent key is a no-op.
    pub fn clear(&mut self, key: &str) -> Result<()> {
        let keys = self.keys_for(key);

        if self.store.contains(&keys.expiration)? {
            self.store.remove(&keys.expiration)?;
        }
        if self.store.contains(&keys.value)? {
            self.store.remove(&keys.value)?;
            debug!("Cleared key {}", keys.value);
        }
        Ok(())
    }

    // == Clear All ==
    /// Removes every record whose storage key contains the prefix.
    ///
    /// With no prefix configured nothing is removed: the store may be shared,
    /// and an empty pattern would match every key in it.
    ///
    /// Returns the number of records removed.
    pub fn clear_all(&mut self) -> Result<usize> {
        let Some(prefix) = self.prefix.as_deref() else {
            warn!("clear_all called without a prefix; nothing removed");
            return Ok(0);
        };

        let matching: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|k| k.contains(prefix))
            .collect();

        for key in &matching {
            self.store.remove(key)?;
        }

        if !matching.is_empty() {
            info!("Cleared {} records matching prefix {:?}", matching.len(), prefix);
        }
        Ok(matching.len())
    }

    // == Get ==
    /// Retrieves the raw string stored for `key`.
    ///
    /// An expired entry is cleared on read and reported as absent.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        if self.is_expired(key)? {
            self.clear(key)?;
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!("Key {} expired", key);
            return Ok(None);
        }

        match self.store.get(&self.derive_key(key))? {
            Some(value) => {
                self.stats.record_hit();
                Ok(Some(value))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, with an optional TTL in seconds.
    ///
    /// The TTL is validated before anything is written. Without a TTL, an
    /// expiration already recorded for `key` is left in place.
    pub fn set(&mut self, key: &str, value: &str, expiration_seconds: Option<f64>) -> Result<()> {
        let deadline = expiration_seconds
            .map(|secs| entry::expiration_deadline(self.clock.now_ms(), secs))
            .transpose()?;

        let keys = self.keys_for(key);
        self.store.set(&keys.value, value)?;

        if let Some(deadline) = deadline {
            self.store.set(&keys.expiration, &deadline.to_string())?;
        }

        debug!("Set key {} (expires_at={:?})", keys.value, deadline);
        Ok(())
    }

    // == Objects ==
    /// Retrieves and deserializes a JSON value stored for `key`.
    pub fn get_object<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| CacheError::Parse {
                key: key.to_string(),
                source,
            })
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub fn set_object<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        expiration_seconds: Option<f64>,
    ) -> Result<()> {
        let json = serde_json::to_string(value).map_err(CacheError::Serialization)?;
        self.set(key, &json, expiration_seconds)
    }

    // == Expiration ==
    /// Returns the stored expiration of `key` in epoch milliseconds.
    pub fn get_expiration(&self, key: &str) -> Result<Option<i64>> {
        self.store
            .get(&self.derive_expiration_key(key))?
            .map(|raw| entry::parse_expiration(key, &raw))
            .transpose()
    }

    /// Sets `key` to expire `expiration_seconds` from now.
    ///
    /// Fractional seconds are truncated. The value record is not required to exist.
    pub fn set_expiration(&mut self, key: &str, expiration_seconds: f64) -> Result<()> {
        let deadline = entry::expiration_deadline(self.clock.now_ms(), expiration_seconds)?;
        self.store
            .set(&self.derive_expiration_key(key), &deadline.to_string())
    }

    /// Returns true if `key` has an expiration that has passed.
    ///
    /// A key without an expiration record never expires.
    pub fn is_expired(&self, key: &str) -> Result<bool> {
        Ok(match self.get_expiration(key)? {
            Some(deadline) => entry::is_past(self.clock.now_ms(), deadline),
            None => false,
        })
    }

    // == Purge Expired ==
    /// Removes every expired entry in this cache's namespace.
    ///
    /// Runs only when called. Expiration records that do not parse are
    /// skipped. As with [`clear_all`](Self::clear_all), nothing is removed
    /// when no prefix is configured. Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> Result<usize> {
        let Some(prefix) = self.prefix.as_deref() else {
            warn!("purge_expired called without a prefix; nothing removed");
            return Ok(0);
        };
        let namespace = format!("{}{}", prefix, PREFIX_SEPARATOR);
        let now = self.clock.now_ms();

        let mut expired = Vec::new();
        for exp_key in self.store.keys()? {
            let Some(value_key) = exp_key.strip_suffix(EXPIRATION_SUFFIX) else {
                continue;
            };
            if !exp_key.starts_with(&namespace) {
                continue;
            }
            let Some(raw) = self.store.get(&exp_key)? else {
                continue;
            };
            match entry::parse_expiration(value_key, &raw) {
                Ok(deadline) if entry::is_past(now, deadline) => {
                    expired.push((value_key.to_string(), exp_key.clone()));
                }
                Ok(_) => {}
                Err(_) => debug!("Skipping unparseable expiration record {}", exp_key),
            }
        }

        for (value_key, exp_key) in &expired {
            self.store.remove(exp_key)?;
            self.store.remove(value_key)?;
        }

        let count = expired.len();
        self.stats.record_expirations(count as u64);
        if count > 0 {
            info!("Purged {} expired entries", count);
        } else {
            debug!("Purge found no expired entries");
        }
        Ok(count)
    }

    // == Accessors ==
    /// Returns current read statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the backing store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Consumes the cache, returning its collaborators.
    pub fn into_inner(self) -> (S, C) {
        (self.store, self.clock)
    }
}
