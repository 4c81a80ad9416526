//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Cache operations themselves are total: a missing or expired key is an
//! empty result, never an error. Only construction can fail.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache was configured with an unusable option
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
