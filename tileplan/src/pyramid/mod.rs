//! The multi-resolution plan: ordered tile grids plus zoom-invariant markers.
//!
//! Index 0 is the least detailed level. Exactly one level has scale factor
//! 1.0; its pixel size is the reference size against which marker positions
//! are stored.

mod error;
mod marker;
mod plan;
mod plan_ini;

pub use error::{PlanError, PyramidError};
pub use marker::{Marker, MarkerKind, MarkerPlacement};
pub use plan::{LevelDescription, PlanDescription, SourceLayout};

use crate::coord::Coordinate;
use crate::grid::TileGrid;
use std::sync::Arc;

/// Scale factor of the reference level.
pub const REFERENCE_SCALE: f32 = 1.0;

/// Ordered set of tile grids with one active level.
#[derive(Debug)]
pub struct Pyramid {
    grids: Vec<Arc<TileGrid>>,
    reference_level: usize,
    active_level: usize,
    markers: Vec<Marker>,
}

impl Pyramid {
    /// Creates a pyramid whose active level is the reference level.
    ///
    /// # Errors
    ///
    /// Fails if there are no grids, if scale factors are not strictly
    /// ascending (which also makes them unique), or if no grid has scale 1.0.
    pub fn new(grids: Vec<TileGrid>, markers: Vec<Marker>) -> Result<Self, PyramidError> {
        if grids.is_empty() {
            return Err(PyramidError::NoLevels);
        }
        for (level, pair) in grids.windows(2).enumerate() {
            let (previous, current) = (pair[0].scale_factor(), pair[1].scale_factor());
            if current <= previous {
                return Err(PyramidError::ScalesNotAscending {
                    level: level + 1,
                    previous,
                    current,
                });
            }
        }
        let reference_level = grids
            .iter()
            .position(|g| g.scale_factor() == REFERENCE_SCALE)
            .ok_or(PyramidError::MissingReferenceLevel)?;

        Ok(Self {
            grids: grids.into_iter().map(Arc::new).collect(),
            reference_level,
            active_level: reference_level,
            markers,
        })
    }

    pub fn grids(&self) -> &[Arc<TileGrid>] {
        &self.grids
    }

    pub fn grid(&self, level: usize) -> Option<&Arc<TileGrid>> {
        self.grids.get(level)
    }

    pub fn level_count(&self) -> usize {
        self.grids.len()
    }

    pub fn active_level(&self) -> usize {
        self.active_level
    }

    pub fn active_grid(&self) -> &Arc<TileGrid> {
        &self.grids[self.active_level]
    }

    /// Level whose scale factor is 1.0.
    pub fn reference_level(&self) -> usize {
        self.reference_level
    }

    /// Pixel size of the reference level.
    pub fn reference_size(&self) -> Coordinate {
        self.grids[self.reference_level].size()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Switches the active level.
    pub fn set_active_level(&mut self, level: usize) -> Result<&Arc<TileGrid>, PyramidError> {
        if level >= self.grids.len() {
            return Err(PyramidError::LevelOutOfRange {
                level,
                count: self.grids.len(),
            });
        }
        self.active_level = level;
        Ok(&self.grids[level])
    }

    /// Screen placements of every marker at the active scale.
    pub fn marker_placements(&self) -> Vec<MarkerPlacement> {
        let scale = self.active_grid().scale_factor();
        self.markers.iter().map(|m| m.placement(scale)).collect()
    }

    /// Payload bytes resident across every level.
    pub fn resident_bytes(&self) -> usize {
        self.grids.iter().map(|g| g.resident_bytes()).sum()
    }
}
