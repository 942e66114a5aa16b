//! Cache Statistics Module
//!
//! Point-in-time view of an instance's size and sweep activity.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache instance state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Occupied slots, including expired items not yet swept
    pub total_items: usize,
    /// Completed sweep passes since the instance was created
    pub sweeps: u64,
    /// Items removed by sweep passes
    pub evicted: u64,
    /// Number of sweep tasks currently alive (0 or 1)
    pub active_sweepers: usize,
}

impl CacheStats {
    // == Eviction Rate ==
    /// Average number of items removed per sweep pass, or 0.0 before the first pass.
    pub fn evictions_per_sweep(&self) -> f64 {
        if self.sweeps == 0 {
            0.0
        } else {
            self.evicted as f64 / self.sweeps as f64
        }
    }
}

// == Sweep Counters ==
/// Lock-free counters updated by sweep passes.
#[derive(Debug, Default)]
pub(crate) struct SweepCounters {
    sweeps: AtomicU64,
    evicted: AtomicU64,
}

impl SweepCounters {
    /// Records one completed pass that removed `removed` items.
    pub(crate) fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.evicted.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub(crate) fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    pub(crate) fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}
