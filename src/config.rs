//! Configuration Module
//!
//! Construction options for a cache: uniform TTL, capacity bound and sweep
//! period. Every option is independently optional and they compose freely.

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Defaults ==
/// Default period of the background sweep (5 minutes).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Capacity used by [`CacheConfig::large_dataset`].
pub const LARGE_DATASET_MAX_ENTRIES: usize = 100_000;

/// TTL used by [`CacheConfig::large_dataset`].
pub const LARGE_DATASET_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// Sweep period used by [`CacheConfig::large_dataset`].
pub const LARGE_DATASET_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache configuration parameters.
///
/// ```
/// use std::time::Duration;
/// use lru_ttl_cache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .max_entries(500)
///     .expiry_duration(Duration::from_secs(60))
///     .cleanup_interval(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Uniform TTL applied to every insert, None = entries never expire
    pub expiry_duration: Option<Duration>,
    /// Capacity bound, None = unbounded
    pub max_entries: Option<usize>,
    /// Period of the background sweep
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    // == Presets ==
    /// Entries never expire; optionally bounded by `max_entries`.
    pub fn persistent(max_entries: Option<usize>) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }

    /// Every entry expires `expiry_duration` after its last insert.
    pub fn with_expiry(expiry_duration: Duration) -> Self {
        Self {
            expiry_duration: Some(expiry_duration),
            ..Self::default()
        }
    }

    /// Bounded capacity and uniform TTL combined.
    pub fn with_capacity_and_expiry(max_entries: usize, expiry_duration: Duration) -> Self {
        Self {
            expiry_duration: Some(expiry_duration),
            max_entries: Some(max_entries),
            ..Self::default()
        }
    }

    /// Defaults tuned for large working sets: a generous bound, a long TTL
    /// and a short sweep period so stale entries do not pile up.
    pub fn large_dataset() -> Self {
        Self {
            expiry_duration: Some(LARGE_DATASET_EXPIRY),
            max_entries: Some(LARGE_DATASET_MAX_ENTRIES),
            cleanup_interval: LARGE_DATASET_CLEANUP_INTERVAL,
        }
    }

    // == Builder Setters ==
    /// Sets the uniform TTL.
    pub fn expiry_duration(mut self, expiry_duration: Duration) -> Self {
        self.expiry_duration = Some(expiry_duration);
        self
    }

    /// Sets the capacity bound.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Sets the background sweep period.
    pub fn cleanup_interval(mut self, cleanup_interval: Duration) -> Self {
        self.cleanup_interval = cleanup_interval;
        self
    }

    // == Validation ==
    /// Rejects options the cache cannot honour. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidConfiguration(
                "cleanup_interval must be greater than zero".to_string(),
            ));
        }

        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfiguration(
                "max_entries must be at least 1".to_string(),
            ));
        }

        if self.expiry_duration.is_some_and(|ttl| ttl.is_zero()) {
            return Err(CacheError::InvalidConfiguration(
                "expiry_duration must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry_duration: None,
            max_entries: None,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}
