//! Cachomatic - A namespaced key/value cache over local storage
//!
//! Stores strings and JSON values under prefixed keys, with optional TTL
//! expiration evaluated lazily on read.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod storage;

pub use cache::{Cache, CacheStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
#[cfg(feature = "browser")]
pub use storage::LocalStorage;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
