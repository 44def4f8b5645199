//! Viewer session: the single entry point for pan, zoom and reload.
//!
//! A [`PlanViewer`] owns the [`Pyramid`], the [`Viewport`] and the
//! [`LoadScheduler`]. Movement clamps the viewport against the active grid;
//! loading schedules a pass for the current (grid, viewport) pair. Zooming
//! swaps the active level and remaps the viewport so the focal pixel stays
//! put. It then releases the old level's payloads and schedules again.

mod config;
mod error;
mod notifier;

pub use config::{ViewerConfig, ViewerServices, DEFAULT_PAYLOAD_BUDGET};
pub use error::ViewerError;
pub use notifier::{LogNotifier, Notifier};

use std::sync::Arc;

use tracing::{debug, info};

use crate::coord::Coordinate;
use crate::eviction::EvictionPolicy;
use crate::executor::{DecodeExecutor, DecodeStatsSnapshot, LoadServices};
use crate::grid::TileGrid;
use crate::pyramid::{MarkerPlacement, Pyramid};
use crate::scheduler::{LoadPass, LoadScheduler, ScheduleOutcome};
use crate::sink::TileSink;
use crate::telemetry::{
    MemoryTelemetry, PayloadBudgetTelemetry, SystemMemoryTelemetry, TelemetryKind,
};
use crate::viewport::Viewport;
use crate::zoom::{remap_position, target_level, ZoomDirection};

/// Result of a successful zoom.
#[derive(Debug, Clone)]
pub struct ZoomOutcome {
    pub from_level: usize,
    pub to_level: usize,
    /// New scale factor over old scale factor
    pub relative_scale: f32,
    /// Viewport position after remapping and clamping
    pub position: Coordinate,
    /// Pass scheduled for the new level
    pub pass: LoadPass,
}

/// An interactive session over one plan pyramid.
pub struct PlanViewer {
    pyramid: Pyramid,
    viewport: Viewport,
    scheduler: LoadScheduler,
    executor: DecodeExecutor,
    sink: Arc<dyn TileSink>,
    notifier: Arc<dyn Notifier>,
}

impl PlanViewer {
    /// Creates a session showing the pyramid's reference level from the
    /// top-left corner. Nothing is loaded until [`load`](Self::load).
    pub fn new(
        pyramid: Pyramid,
        viewport_size: Coordinate,
        services: ViewerServices,
        config: &ViewerConfig,
    ) -> Self {
        let telemetry: Arc<dyn MemoryTelemetry> = match services.telemetry {
            Some(telemetry) => telemetry,
            None => match config.telemetry {
                TelemetryKind::System => Arc::new(SystemMemoryTelemetry::new()),
                TelemetryKind::Budget => Arc::new(PayloadBudgetTelemetry::new(
                    pyramid.grids().to_vec(),
                    config.payload_budget,
                )),
            },
        };

        let load_services = LoadServices::new(
            services.source,
            services.decoder,
            Arc::clone(&services.sink),
        )
        .with_logger(services.logger);
        let executor = DecodeExecutor::new(services.runtime.clone(), load_services, config.decode);
        let eviction = Arc::new(EvictionPolicy::new(telemetry, config.eviction_threshold));
        let scheduler = LoadScheduler::new(
            services.runtime,
            Arc::new(executor.clone()),
            eviction,
            Arc::clone(&services.sink),
        );

        let viewport = Viewport::with_position(
            Coordinate::ZERO,
            viewport_size,
            pyramid.active_grid().size(),
        );

        debug!(
            levels = pyramid.level_count(),
            active_level = pyramid.active_level(),
            width = viewport_size.x,
            height = viewport_size.y,
            max_concurrent = executor.max_concurrent(),
            "Plan viewer created"
        );

        Self {
            pyramid,
            viewport,
            scheduler,
            executor,
            sink: services.sink,
            notifier: services.notifier,
        }
    }

    /// Schedules a pass for the current view. Repeated calls without
    /// movement reuse the running pass.
    pub fn load(&mut self) -> ScheduleOutcome {
        let grid = Arc::clone(self.pyramid.active_grid());
        self.scheduler
            .schedule(&grid, self.pyramid.active_level(), &self.viewport)
    }

    /// Schedules a fresh pass for the current view, retrying failed tiles.
    pub fn reload(&mut self) -> LoadPass {
        let grid = Arc::clone(self.pyramid.active_grid());
        self.scheduler
            .reschedule(&grid, self.pyramid.active_level(), &self.viewport)
    }

    /// Moves the viewport without scheduling.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        let grid_size = self.pyramid.active_grid().size();
        self.viewport.translate(dx, dy, grid_size);
    }

    /// Moves the viewport and loads the new view.
    pub fn pan(&mut self, dx: i32, dy: i32) -> ScheduleOutcome {
        self.translate(dx, dy);
        self.load()
    }

    /// Changes the visible extent (display resize) and loads the new view.
    pub fn resize(&mut self, size: Coordinate) -> ScheduleOutcome {
        let grid_size = self.pyramid.active_grid().size();
        self.viewport.resize(size, grid_size);
        self.load()
    }

    /// Steps one level in `direction`, keeping the focal pixel in place.
    ///
    /// The previous level's payloads are released and the sink is told to
    /// drop its surfaces, so only the active level stays resident.
    ///
    /// At either end of the pyramid the notifier receives one notice and
    /// [`ViewerError::ZoomLimitReached`] is returned with nothing changed.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<ZoomOutcome, ViewerError> {
        let from_level = self.pyramid.active_level();
        let Some(to_level) = target_level(from_level, self.pyramid.level_count(), direction) else {
            let error = ViewerError::ZoomLimitReached { direction };
            self.notifier.notify(&error.to_string());
            return Err(error);
        };

        let old_grid = Arc::clone(self.pyramid.active_grid());
        let grid = Arc::clone(self.pyramid.set_active_level(to_level)?);
        let relative_scale = grid.scale_factor() / old_grid.scale_factor();

        let position = remap_position(
            self.viewport.position(),
            relative_scale,
            self.viewport.size(),
        );
        self.viewport.set_position(position, grid.size());

        // Old decode tasks must be cancelled first so none can store into the
        // grid after it is cleared.
        self.scheduler.cancel();
        let released = old_grid.forget_all();
        self.sink.on_surfaces_discarded(from_level);

        let pass = self
            .scheduler
            .schedule(&grid, to_level, &self.viewport)
            .into_pass();

        info!(
            from_level,
            to_level,
            relative_scale,
            released,
            x = self.viewport.position().x,
            y = self.viewport.position().y,
            "Zoomed {}",
            direction
        );

        Ok(ZoomOutcome {
            from_level,
            to_level,
            relative_scale,
            position: self.viewport.position(),
            pass,
        })
    }

    /// Screen placements of every marker at the active scale.
    pub fn marker_placements(&self) -> Vec<MarkerPlacement> {
        self.pyramid.marker_placements()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pyramid(&self) -> &Pyramid {
        &self.pyramid
    }

    pub fn active_grid(&self) -> &Arc<TileGrid> {
        self.pyramid.active_grid()
    }

    pub fn active_level(&self) -> usize {
        self.pyramid.active_level()
    }

    pub fn scheduler(&self) -> &LoadScheduler {
        &self.scheduler
    }

    pub fn decode_stats(&self) -> DecodeStatsSnapshot {
        self.executor.stats()
    }

    /// Decode tasks still in flight.
    pub fn live_tasks(&self) -> usize {
        self.executor.live_tasks()
    }
}

impl std::fmt::Debug for PlanViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanViewer")
            .field("active_level", &self.pyramid.active_level())
            .field("viewport", &self.viewport)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
