//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::{ActivityCounters, CacheStats};
pub use store::{CacheStore, SweepOutcome};
