//! Scheduler counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Scheduler statistics for monitoring.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    /// Passes spawned.
    pub passes_started: AtomicU64,
    /// Schedule requests answered with the existing pass.
    pub passes_reused: AtomicU64,
    /// Passes cancelled before finishing.
    pub passes_cancelled: AtomicU64,
    /// Load requests handed to the loader.
    pub tiles_submitted: AtomicU64,
}

impl SchedulerStats {
    pub fn snapshot(&self) -> SchedulerStatsSnapshot {
        SchedulerStatsSnapshot {
            passes_started: self.passes_started.load(Ordering::Relaxed),
            passes_reused: self.passes_reused.load(Ordering::Relaxed),
            passes_cancelled: self.passes_cancelled.load(Ordering::Relaxed),
            tiles_submitted: self.tiles_submitted.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of scheduler statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStatsSnapshot {
    pub passes_started: u64,
    pub passes_reused: u64,
    pub passes_cancelled: u64,
    pub tiles_submitted: u64,
}
