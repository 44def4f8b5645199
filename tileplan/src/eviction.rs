//! Memory-pressure eviction of spatially irrelevant tiles.
//!
//! When the resident ratio reaches the threshold, the loaded tile farthest
//! (Euclidean, in tile units) from the tile about to be loaded is forgotten.
//! At most one tile is evicted per call; the scheduler calls once per
//! submitted tile, so sustained pressure is relieved incrementally.

use std::sync::Arc;

use tracing::debug;

use crate::coord::Coordinate;
use crate::grid::{LoadedSnapshot, TileGrid};
use crate::telemetry::MemoryTelemetry;

/// Default resident ratio at which eviction starts.
pub const DEFAULT_EVICTION_THRESHOLD: f32 = 0.75;

/// Decides whether and which loaded tile to evict.
pub struct EvictionPolicy {
    telemetry: Arc<dyn MemoryTelemetry>,
    threshold: f32,
}

impl EvictionPolicy {
    pub fn new(telemetry: Arc<dyn MemoryTelemetry>, threshold: f32) -> Self {
        Self {
            telemetry,
            threshold,
        }
    }

    /// Policy with the default 0.75 threshold.
    pub fn with_default_threshold(telemetry: Arc<dyn MemoryTelemetry>) -> Self {
        Self::new(telemetry, DEFAULT_EVICTION_THRESHOLD)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True when the resident ratio is at or above the threshold.
    pub fn is_under_pressure(&self) -> bool {
        self.telemetry.resident_ratio() >= self.threshold
    }

    /// Evicts at most one tile from `grid` if memory is under pressure.
    ///
    /// Returns the coordinate of the forgotten tile.
    pub fn maybe_evict(&self, grid: &TileGrid, about_to_load: Coordinate) -> Option<Coordinate> {
        if !self.is_under_pressure() {
            return None;
        }

        let victim = select_victim(&grid.loaded_snapshot(), about_to_load)?;
        let freed = grid.tile(victim)?.forget().map_or(0, |b| b.byte_len());

        debug!(
            tile_x = victim.x,
            tile_y = victim.y,
            loading_x = about_to_load.x,
            loading_y = about_to_load.y,
            freed_bytes = freed,
            "Evicted tile under memory pressure"
        );

        Some(victim)
    }
}

impl std::fmt::Debug for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvictionPolicy")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// The loaded tile farthest from `about_to_load`, first maximum in scan order.
///
/// Only strictly positive distances qualify, so the tile being loaded is
/// never chosen.
pub fn select_victim(
    snapshot: &LoadedSnapshot<'_>,
    about_to_load: Coordinate,
) -> Option<Coordinate> {
    let mut max_gap = 0.0;
    let mut victim = None;
    for (c, _) in snapshot.loaded() {
        let gap = about_to_load.distance(c);
        if gap > max_gap {
            max_gap = gap;
            victim = Some(c);
        }
    }
    victim
}
