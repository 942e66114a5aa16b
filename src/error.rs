//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache instances and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key already present in a cache, or cache name already registered
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Key not present in a cache
    #[error("Not found: {0}")]
    NotFound(String),

    /// Sweep task requested outside of a tokio runtime
    #[error("No tokio runtime available to run the sweep task")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
