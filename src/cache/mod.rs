//! Cache Module
//!
//! Provides namespaced key/value caching with lazy TTL expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{StorageKeys, EXPIRATION_SUFFIX, PREFIX_SEPARATOR};
pub use stats::CacheStats;
pub use store::Cache;
