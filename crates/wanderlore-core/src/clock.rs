//! Clock abstraction for deterministic ticks.
//!
//! Every engine reads time through [`Clock`] so that tick loops, respawn
//! delays and expiry can be driven from a test harness.

use chrono::{DateTime, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Milliseconds elapsed from `earlier` to `later`; negative when the clock
/// went backwards.
#[must_use]
pub fn elapsed_millis(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds()
}
