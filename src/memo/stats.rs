//! Memo Statistics Module
//!
//! Tracks per-function hit, miss, and reclamation counters.

use serde::Serialize;

// == Memo Stats ==
/// Counters for one memoized function.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoStats {
    /// Calls answered from a valid entry
    pub hits: u64,
    /// Calls that had to invoke the wrapped function
    pub misses: u64,
    /// Expired entries dropped on lookup
    pub expirations: u64,
    /// Entries removed by the periodic sweeper
    pub swept: u64,
    /// Entries physically stored right now (valid or not)
    pub total_entries: usize,
}

impl MemoStats {
    // == Constructor ==
    /// Creates a new MemoStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if the function was never called.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
