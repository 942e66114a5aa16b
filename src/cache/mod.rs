//! Cache Module
//!
//! Provides concurrent in-memory caching with per-item TTL and background sweeping.

mod entry;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::{CacheItem, Ttl};
pub use stats::CacheStats;
pub use store::CacheInstance;

// == Public Constants ==
/// Write-time sentinel: the item never expires
pub const NO_EXPIRATION: Ttl = Ttl::Never;

/// Default per-item TTL used by [`Ttl::Default`] writes
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(5 * 60);

/// Default period of the background expiry sweep
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(500);
