//! Clock Module
//!
//! Time sources for expiration bookkeeping, in Unix epoch milliseconds.

use std::cell::Cell;

// == Clock Trait ==
/// Source of the current time.
pub trait Clock {
    /// Returns current Unix timestamp in milliseconds.
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

// == System Clock ==
/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Useful for exercising expiration without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    /// Creates a clock frozen at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    /// Moves the clock forward by `ms` milliseconds, saturating at the i64 bounds.
    pub fn advance_ms(&self, ms: i64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Moves the clock forward by `secs` seconds, saturating at the i64 bounds.
    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs.saturating_mul(1000));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
