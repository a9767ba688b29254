//! Cache Entry Module
//!
//! Storage layout of a logical cache entry: a value record and an optional
//! expiration record, both addressed by keys derived from the namespace prefix.

use crate::error::{CacheError, Result};

// == Layout Constants ==
/// Separator placed between the prefix and the logical key
pub const PREFIX_SEPARATOR: &str = "-";

/// Suffix appended to a value key to address its expiration record
pub const EXPIRATION_SUFFIX: &str = "-expiration";

// == Storage Keys ==
/// The two storage keys backing one logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key of the value record
    pub value: String,
    /// Key of the expiration record
    pub expiration: String,
}

impl StorageKeys {
    /// Derives both storage keys for `key` under an optional prefix.
    pub fn derive(prefix: Option<&str>, key: &str) -> Self {
        let value = derive_key(prefix, key);
        let expiration = format!("{}{}", value, EXPIRATION_SUFFIX);
        Self { value, expiration }
    }
}

/// Returns `key` unchanged without a prefix, else `"<prefix>-<key>"`.
pub fn derive_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}{}{}", prefix, PREFIX_SEPARATOR, key),
        None => key.to_string(),
    }
}

// == Expiration ==
/// Computes the epoch-ms deadline `now + seconds * 1000`.
///
/// Fractional seconds are truncated toward zero. Negative values are allowed
/// and yield a deadline in the past.
pub fn expiration_deadline(now_ms: i64, seconds: f64) -> Result<i64> {
    if !seconds.is_finite() {
        return Err(CacheError::InvalidArgument(format!(
            "Expiration must be a finite number of seconds, got {}",
            seconds
        )));
    }

    // `as` saturates; a saturated value overflows below and is rejected
    (seconds.trunc() as i64)
        .checked_mul(1000)
        .and_then(|ms| now_ms.checked_add(ms))
        .ok_or_else(|| {
            CacheError::InvalidArgument(format!("Expiration of {} seconds is out of range", seconds))
        })
}

/// Parses a stored expiration record.
pub fn parse_expiration(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CacheError::InvalidExpiration {
            key: key.to_string(),
            raw: raw.to_string(),
        })
}

/// Checks a deadline against the current time.
///
/// Boundary condition: an entry is expired only once the current time is
/// strictly greater than the deadline; at exactly the deadline it is still live.
pub fn is_past(now_ms: i64, deadline_ms: i64) -> bool {
    now_ms > deadline_ms
}
