//! Decode executor counters.

use std::sync::atomic::{AtomicU64, Ordering};

use super::handle::DecodeOutcome;

/// Running totals of decode outcomes.
#[derive(Debug, Default)]
pub struct DecodeStats {
    decoded: AtomicU64,
    reused: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl DecodeStats {
    pub fn record(&self, outcome: &DecodeOutcome) {
        let counter = match outcome {
            DecodeOutcome::Loaded(_) => &self.decoded,
            DecodeOutcome::AlreadyLoaded(_) => &self.reused,
            DecodeOutcome::Failed(_) => &self.failed,
            DecodeOutcome::Cancelled => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DecodeStatsSnapshot {
        DecodeStatsSnapshot {
            decoded: self.decoded.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DecodeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStatsSnapshot {
    pub decoded: u64,
    pub reused: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl DecodeStatsSnapshot {
    pub fn total(&self) -> u64 {
        self.decoded + self.reused + self.failed + self.cancelled
    }
}
