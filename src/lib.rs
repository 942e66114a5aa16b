//! TTL Cache - named in-process key/value caches
//!
//! Each cache instance stores arbitrary values with an optional per-item TTL
//! and runs a background sweep that evicts expired items. A [`Registry`]
//! arbitrates creation, lookup and deletion of named instances.

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod tasks;

pub use cache::{
    CacheInstance, CacheItem, CacheStats, Ttl, DEFAULT_EXPIRATION, DEFAULT_SWEEP_INTERVAL,
    NO_EXPIRATION,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use registry::{CacheHandle, Registry};
