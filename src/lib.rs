//! LRU TTL Cache - A generic in-process key-value cache
//!
//! Combines time-to-live expiry, a capacity bound with least-recently-used
//! eviction, and bulk operations. Expiry is enforced lazily on access and by
//! a single periodic sweep per cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
