//! Scheduling pass handles and reports.

use std::fmt;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::executor::DecodeOutcome;
use crate::viewport::Viewport;

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// Every ring coordinate was submitted and every task finished
    Completed,
    /// Superseded or cancelled before finishing
    Cancelled,
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStatus::Completed => write!(f, "completed"),
            PassStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Tally of one finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub level: usize,
    pub submitted: usize,
    pub loaded: usize,
    pub already_loaded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub evicted: usize,
    pub status: PassStatus,
}

impl PassReport {
    pub(crate) fn new(level: usize) -> Self {
        Self {
            level,
            submitted: 0,
            loaded: 0,
            already_loaded: 0,
            failed: 0,
            cancelled: 0,
            evicted: 0,
            status: PassStatus::Completed,
        }
    }

    /// Report for a pass that never reported back.
    pub(crate) fn abandoned(level: usize) -> Self {
        Self {
            status: PassStatus::Cancelled,
            ..Self::new(level)
        }
    }

    pub(crate) fn record(&mut self, outcome: &DecodeOutcome) {
        match outcome {
            DecodeOutcome::Loaded(_) => self.loaded += 1,
            DecodeOutcome::AlreadyLoaded(_) => self.already_loaded += 1,
            DecodeOutcome::Failed(_) => self.failed += 1,
            DecodeOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Tiles resident after the pass, whether freshly decoded or not.
    pub fn resident(&self) -> usize {
        self.loaded + self.already_loaded
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} {}: {} submitted, {} loaded, {} already loaded, {} failed, {} cancelled, {} evicted",
            self.level,
            self.status,
            self.submitted,
            self.loaded,
            self.already_loaded,
            self.failed,
            self.cancelled,
            self.evicted
        )
    }
}

/// Handle to a scheduling pass. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LoadPass {
    id: u64,
    level: usize,
    viewport: Viewport,
    cancellation: CancellationToken,
    report: watch::Receiver<Option<PassReport>>,
}

impl LoadPass {
    pub(crate) fn new(
        id: u64,
        level: usize,
        viewport: Viewport,
        cancellation: CancellationToken,
        report: watch::Receiver<Option<PassReport>>,
    ) -> Self {
        Self {
            id,
            level,
            viewport,
            cancellation,
            report,
        }
    }

    /// Sequence number, unique per scheduler.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Viewport the pass was scheduled for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// True once the worker has published its report.
    pub fn is_finished(&self) -> bool {
        self.report.borrow().is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Cancels the pass and every request it issued.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Waits for the worker to finish and returns its report.
    pub async fn wait(mut self) -> PassReport {
        let level = self.level;
        match self.report.wait_for(Option::is_some).await {
            Ok(report) => (*report).unwrap_or_else(|| PassReport::abandoned(level)),
            Err(_) => PassReport::abandoned(level),
        }
    }
}
