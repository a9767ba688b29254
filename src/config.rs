//! Configuration Module
//!
//! Handles loading the cache namespace configuration from environment variables.

use std::env;

/// Environment variable holding the key-namespace prefix.
pub const PREFIX_ENV_VAR: &str = "CACHE_PREFIX";

/// Cache configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Namespace prefix for storage keys, None = no namespacing
    pub prefix: Option<String>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Key namespace prefix (default: none; empty is treated as unset)
    pub fn from_env() -> Self {
        Self {
            prefix: env::var(PREFIX_ENV_VAR).ok().filter(|p| !p.is_empty()),
        }
    }

    /// Returns a copy of this configuration using the given prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}
