//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Missing keys are never errors: lookups report absence as `None`/`false`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Stored value is not valid JSON
    #[error("Failed to parse cached value for key {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized to JSON
    #[error("Failed to serialize value: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Expiration record is not an epoch-millisecond integer
    #[error("Invalid expiration record for key {key}: {raw:?}")]
    InvalidExpiration { key: String, raw: String },

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Storage(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_names_key() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CacheError::Parse {
            key: "profile".to_string(),
            source,
        };
        assert!(err.to_string().contains("profile"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Storage(msg) if msg.contains("denied")));
    }
}
