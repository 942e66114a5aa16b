//! Cache Entry Module
//!
//! Defines individual cache items and the TTL policy applied when they are written.

use std::time::{Duration, Instant};

// == TTL Policy ==
/// Expiration requested by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Expire after the owning instance's default TTL
    #[default]
    Default,
    /// Never expire
    Never,
    /// Expire after the given duration
    After(Duration),
}

impl Ttl {
    // == Deadline ==
    /// Resolves the policy into an absolute deadline, computed once at write time.
    ///
    /// # Returns
    /// - `None` for [`Ttl::Never`]
    /// - `Some(now + ttl)` otherwise, with `default_ttl` standing in for [`Ttl::Default`]
    /// - `None` when `now + ttl` is past what the clock can represent
    pub fn deadline(self, default_ttl: Duration) -> Option<Instant> {
        let ttl = match self {
            Ttl::Never => return None,
            Ttl::Default => default_ttl,
            Ttl::After(ttl) if ttl.is_zero() => default_ttl,
            Ttl::After(ttl) => ttl,
        };
        // A deadline beyond the clock's range is never reached
        Instant::now().checked_add(ttl)
    }
}

impl From<Duration> for Ttl {
    /// Zero means "use the instance default", as with the untyped API.
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Ttl::Default
        } else {
            Ttl::After(ttl)
        }
    }
}

// == Cache Item ==
/// A single stored value and its fixed expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheItem<V> {
    /// The stored payload, never inspected by the cache
    pub value: V,
    /// Expiration deadline on the monotonic clock, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheItem<V> {
    /// Creates an item whose deadline is resolved against `default_ttl`.
    pub fn new(value: V, ttl: Ttl, default_ttl: Duration) -> Self {
        Self {
            value,
            expires_at: ttl.deadline(default_ttl),
        }
    }

    // == Is Expired ==
    /// Checks the deadline against the current time.
    ///
    /// An item is expired once the current time is strictly past its deadline.
    /// Items without a deadline never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the item never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
