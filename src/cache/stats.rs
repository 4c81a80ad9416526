//! Cache Statistics Module
//!
//! Fixed-shape snapshot of cache configuration and activity.

use serde::Serialize;

// == Cache Stats ==
/// Read-only snapshot of a cache.
///
/// Taking a snapshot never scans entries or triggers a cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries, including expired ones not yet swept
    pub entries: usize,
    /// Capacity bound, if any
    pub max_entries: Option<usize>,
    /// Whether entries expire
    pub has_expiry: bool,
    /// Uniform TTL in milliseconds, if any
    pub expiry_duration_ms: Option<u64>,
    /// Background sweep period in milliseconds
    pub cleanup_interval_ms: u64,
    /// Current value of the recency counter
    pub access_counter: u64,
    /// Number of lookups that returned a live value
    pub hits: u64,
    /// Number of lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed by the capacity bound
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Activity Counters ==
/// Running counters kept by the store and copied into each snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl ActivityCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
