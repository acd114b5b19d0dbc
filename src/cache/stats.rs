//! Store Statistics Module
//!
//! Tracks read/write activity counters for a store.

use serde::Serialize;

// == Store Stats ==
/// Activity counters for a store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that found a live value
    pub hits: u64,
    /// Reads that found nothing usable (key absent or expired)
    pub misses: u64,
    /// Entries removed lazily after their policy elapsed
    pub expirations: u64,
    /// Entries written by any write operation
    pub writes: u64,
    /// Current number of entries in the table
    pub entries: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the read hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the lazy-expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Increments the write counter.
    pub fn record_write(&mut self) {
        self.writes += 1;
    }
}
