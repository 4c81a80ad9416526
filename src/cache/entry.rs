//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Recency stamp taken from the store's access counter
    pub access_time: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `expires_at` - Absolute expiration instant, if any
    /// * `access_time` - Recency stamp for the insert
    pub fn new(value: V, expires_at: Option<Instant>, access_time: u64) -> Self {
        Self {
            value,
            expires_at,
            access_time,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the
    /// expiration instant, so an entry never outlives its full TTL.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}
