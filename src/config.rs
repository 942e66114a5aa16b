//! Configuration Module
//!
//! Per-instance cache settings, with optional loading from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_EXPIRATION, DEFAULT_SWEEP_INTERVAL};

/// Cache instance configuration parameters.
///
/// Zero durations are never stored: they fall back to the crate defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How often the background sweep purges expired items
    pub sweep_interval: Duration,
    /// TTL applied to writes made with [`Ttl::Default`](crate::Ttl::Default)
    pub default_ttl: Duration,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a config, substituting the defaults for zero durations.
    ///
    /// # Arguments
    /// * `sweep_interval` - Sweep period (zero = [`DEFAULT_SWEEP_INTERVAL`])
    /// * `default_ttl` - Instance default TTL (zero = [`DEFAULT_EXPIRATION`])
    pub fn new(sweep_interval: Duration, default_ttl: Duration) -> Self {
        Self {
            sweep_interval: if sweep_interval.is_zero() {
                DEFAULT_SWEEP_INTERVAL
            } else {
                sweep_interval
            },
            default_ttl: if default_ttl.is_zero() {
                DEFAULT_EXPIRATION
            } else {
                default_ttl
            },
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep interval in milliseconds (default: 500)
    /// - `CACHE_DEFAULT_TTL_SECS` - Default item TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        let sweep_interval = env::var("CACHE_SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL);
        let default_ttl = env::var("CACHE_DEFAULT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_EXPIRATION);

        Self::new(sweep_interval, default_ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            default_ttl: DEFAULT_EXPIRATION,
        }
    }
}
