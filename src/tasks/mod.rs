//! Background Tasks Module
//!
//! Contains background tasks that run periodically on behalf of cache instances.
//!
//! # Tasks
//! - Sweep: cancellable fixed-interval task driving expired-item eviction

mod sweep;

pub use sweep::Sweeper;
