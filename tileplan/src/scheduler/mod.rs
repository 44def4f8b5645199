//! Lazy-load scheduler.
//!
//! A pass walks the tiles around the viewport's focal tile in ring order and
//! hands each one to a [`TileLoader`], relieving memory pressure through the
//! [`EvictionPolicy`] before every submission. At most one pass is live per
//! scheduler; starting a new one cancels the old pass and every decode task
//! it issued.
//!
//! ```text
//!   schedule(grid, level, viewport)
//!          │
//!          ├── same grid + viewport, not cancelled ──▶ Reused(current pass)
//!          │
//!          └── otherwise: cancel current pass, loader.cancel_all()
//!                         spawn worker ──▶ Started(new pass)
//!
//!   worker:  for c in load_order(grid, viewport)
//!              if cancelled: stop
//!              eviction.maybe_evict(grid, c) ──▶ sink.on_tile_evicted
//!              loader.submit(c)
//!            collect outcomes as they finish ──▶ PassReport
//! ```

mod order;
mod pass;
mod stats;

pub use order::{calculate_center_tile, load_order, loading_level};
pub use pass::{LoadPass, PassReport, PassStatus};
pub use stats::{SchedulerStats, SchedulerStatsSnapshot};

pub use crate::coord::{calculate_neighbours, neighbours_of_level};

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::eviction::EvictionPolicy;
use crate::executor::{LoadRequest, TileLoader};
use crate::grid::TileGrid;
use crate::sink::TileSink;
use crate::viewport::Viewport;

/// Result of a schedule request.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    /// A new pass was spawned
    Started(LoadPass),
    /// The request matched the current pass, which was left running
    Reused(LoadPass),
}

impl ScheduleOutcome {
    pub fn pass(&self) -> &LoadPass {
        match self {
            Self::Started(pass) | Self::Reused(pass) => pass,
        }
    }

    pub fn into_pass(self) -> LoadPass {
        match self {
            Self::Started(pass) | Self::Reused(pass) => pass,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

struct ActivePass {
    grid: Arc<TileGrid>,
    viewport: Viewport,
    pass: LoadPass,
}

impl ActivePass {
    fn matches(&self, grid: &Arc<TileGrid>, viewport: &Viewport) -> bool {
        Arc::ptr_eq(&self.grid, grid) && self.viewport == *viewport && !self.pass.is_cancelled()
    }
}

/// Owns the single live scheduling pass.
pub struct LoadScheduler {
    runtime: Handle,
    loader: Arc<dyn TileLoader>,
    eviction: Arc<EvictionPolicy>,
    sink: Arc<dyn TileSink>,
    stats: Arc<SchedulerStats>,
    current: Option<ActivePass>,
    next_pass_id: u64,
}

impl LoadScheduler {
    pub fn new(
        runtime: Handle,
        loader: Arc<dyn TileLoader>,
        eviction: Arc<EvictionPolicy>,
        sink: Arc<dyn TileSink>,
    ) -> Self {
        Self {
            runtime,
            loader,
            eviction,
            sink,
            stats: Arc::new(SchedulerStats::default()),
            current: None,
            next_pass_id: 0,
        }
    }

    /// Starts a pass for `(grid, viewport)` unless the current pass already
    /// covers exactly that pair.
    pub fn schedule(
        &mut self,
        grid: &Arc<TileGrid>,
        level: usize,
        viewport: &Viewport,
    ) -> ScheduleOutcome {
        if let Some(active) = self.current.as_ref().filter(|a| a.matches(grid, viewport)) {
            self.stats.passes_reused.fetch_add(1, Ordering::Relaxed);
            debug!(pass = active.pass.id(), level, "Reusing current load pass");
            return ScheduleOutcome::Reused(active.pass.clone());
        }
        ScheduleOutcome::Started(self.start_pass(grid, level, viewport))
    }

    /// Starts a fresh pass even if the current one matches.
    pub fn reschedule(
        &mut self,
        grid: &Arc<TileGrid>,
        level: usize,
        viewport: &Viewport,
    ) -> LoadPass {
        self.start_pass(grid, level, viewport)
    }

    /// Cancels the current pass and all outstanding decode tasks.
    ///
    /// Returns `true` if a running pass was cancelled.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.current.as_ref() else {
            return false;
        };
        let was_running = !active.pass.is_finished() && !active.pass.is_cancelled();
        active.pass.cancel();
        let signalled = self.loader.cancel_all();
        if was_running {
            self.stats.passes_cancelled.fetch_add(1, Ordering::Relaxed);
            debug!(pass = active.pass.id(), tasks = signalled, "Cancelled load pass");
        }
        was_running
    }

    pub fn current_pass(&self) -> Option<LoadPass> {
        self.current.as_ref().map(|a| a.pass.clone())
    }

    pub fn stats(&self) -> Arc<SchedulerStats> {
        Arc::clone(&self.stats)
    }

    pub fn loader(&self) -> &Arc<dyn TileLoader> {
        &self.loader
    }

    pub fn sink(&self) -> &Arc<dyn TileSink> {
        &self.sink
    }

    fn start_pass(&mut self, grid: &Arc<TileGrid>, level: usize, viewport: &Viewport) -> LoadPass {
        self.cancel();

        let id = self.next_pass_id;
        self.next_pass_id += 1;

        let cancellation = CancellationToken::new();
        let (report_tx, report_rx) = watch::channel(None);
        let pass = LoadPass::new(id, level, *viewport, cancellation.clone(), report_rx);

        let worker = PassWorker {
            id,
            grid: Arc::clone(grid),
            level,
            viewport: *viewport,
            cancellation,
            loader: Arc::clone(&self.loader),
            eviction: Arc::clone(&self.eviction),
            sink: Arc::clone(&self.sink),
            stats: Arc::clone(&self.stats),
        };
        self.runtime.spawn(async move {
            let report = worker.run().await;
            report_tx.send_replace(Some(report));
        });

        self.stats.passes_started.fetch_add(1, Ordering::Relaxed);
        self.current = Some(ActivePass {
            grid: Arc::clone(grid),
            viewport: *viewport,
            pass: pass.clone(),
        });
        pass
    }
}

impl Drop for LoadScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for LoadScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadScheduler")
            .field("current_pass", &self.current.as_ref().map(|a| a.pass.id()))
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

struct PassWorker {
    id: u64,
    grid: Arc<TileGrid>,
    level: usize,
    viewport: Viewport,
    cancellation: CancellationToken,
    loader: Arc<dyn TileLoader>,
    eviction: Arc<EvictionPolicy>,
    sink: Arc<dyn TileSink>,
    stats: Arc<SchedulerStats>,
}

impl PassWorker {
    async fn run(self) -> PassReport {
        let mut report = PassReport::new(self.level);
        let order = load_order(&self.grid, &self.viewport);

        debug!(
            pass = self.id,
            level = self.level,
            tiles = order.len(),
            position = %self.viewport.position(),
            "Load pass started"
        );

        let mut pending = FuturesUnordered::new();
        for coordinate in order {
            if self.cancellation.is_cancelled() {
                break;
            }
            if let Some(victim) = self.eviction.maybe_evict(&self.grid, coordinate) {
                report.evicted += 1;
                self.sink.on_tile_evicted(self.level, victim);
            }
            let request = LoadRequest::new(
                Arc::clone(&self.grid),
                self.level,
                coordinate,
                self.cancellation.child_token(),
            );
            pending.push(self.loader.submit(request).wait());
            report.submitted += 1;
            self.stats.tiles_submitted.fetch_add(1, Ordering::Relaxed);
        }

        while let Some(outcome) = pending.next().await {
            report.record(&outcome);
        }

        if self.cancellation.is_cancelled() {
            report.status = PassStatus::Cancelled;
            debug!(pass = self.id, submitted = report.submitted, "Load pass cancelled");
        } else {
            info!(
                pass = self.id,
                level = self.level,
                loaded = report.loaded,
                already_loaded = report.already_loaded,
                failed = report.failed,
                evicted = report.evicted,
                "Load pass completed"
            );
        }
        report
    }
}
