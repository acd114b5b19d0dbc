//! Clock Module
//!
//! Abstracts the current-time source so expiration can be exercised
//! against a simulated clock instead of multi-minute sleeps.

use std::fmt::Debug;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of the current time used for creation stamps and expiry checks.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

// == System Clock ==
/// Wall-clock time. The clock every store uses unless told otherwise.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Intended for tests: wire one into a store with `Store::with_clock`
/// and advance it across TTL boundaries.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a manual clock starting at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Creates a manual clock starting at the given instant.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advances the clock by the given delta.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
