//! Declarative plan description and the builder that materializes it.

use super::error::PlanError;
use super::marker::Marker;
use super::Pyramid;
use crate::coord::Coordinate;
use crate::grid::TileGrid;
use crate::tile::SourceRef;

/// Shape of one pyramid level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDescription {
    /// Columns and rows
    pub dimension: Coordinate,
    /// Pixel size of every tile
    pub tile_size: Coordinate,
    /// Scale relative to the reference level
    pub scale_factor: f32,
}

impl LevelDescription {
    pub fn new(dimension: Coordinate, tile_size: Coordinate, scale_factor: f32) -> Self {
        Self {
            dimension,
            tile_size,
            scale_factor,
        }
    }
}

/// Where tile bytes come from. Exactly one mode applies to a whole plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLayout {
    /// Every tile of every level reads the same source
    Single(SourceRef),
    /// One source per level, indexed by level
    PerLevel(Vec<SourceRef>),
    /// Path template expanded per tile; `{level}`, `{x}` and `{y}` are replaced
    PerTile(String),
}

impl SourceLayout {
    /// Source reference for the tile at `coordinate` on `level`.
    ///
    /// For `PerLevel`, a level without an entry falls back to the last one;
    /// [`PlanDescription::build`] rejects such plans before this is reached.
    pub fn source_for(&self, level: usize, coordinate: Coordinate) -> SourceRef {
        match self {
            Self::Single(source) => source.clone(),
            Self::PerLevel(sources) => sources
                .get(level)
                .or_else(|| sources.last())
                .cloned()
                .unwrap_or_else(|| SourceRef::new("")),
            Self::PerTile(template) => SourceRef::new(
                template
                    .replace("{level}", &level.to_string())
                    .replace("{x}", &coordinate.x.to_string())
                    .replace("{y}", &coordinate.y.to_string()),
            ),
        }
    }

    /// Name used in plan files.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::PerLevel(_) => "per-level",
            Self::PerTile(_) => "per-tile",
        }
    }
}

/// Everything needed to build a [`Pyramid`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDescription {
    pub levels: Vec<LevelDescription>,
    pub sources: SourceLayout,
    pub markers: Vec<Marker>,
}

impl PlanDescription {
    pub fn new(levels: Vec<LevelDescription>, sources: SourceLayout) -> Self {
        Self {
            levels,
            sources,
            markers: Vec::new(),
        }
    }

    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    /// Materializes the pyramid.
    ///
    /// # Errors
    ///
    /// Fails if there are no levels, if a per-level layout does not have one
    /// source per level, or if any level or the pyramid as a whole is invalid.
    pub fn build(&self) -> Result<Pyramid, PlanError> {
        if self.levels.is_empty() {
            return Err(PlanError::NoLevels);
        }
        if let SourceLayout::PerLevel(sources) = &self.sources {
            if sources.len() != self.levels.len() {
                return Err(PlanError::SourceCountMismatch {
                    levels: self.levels.len(),
                    sources: sources.len(),
                });
            }
        }

        let grids = self
            .levels
            .iter()
            .enumerate()
            .map(|(level, desc)| {
                TileGrid::from_sources(desc.dimension, desc.tile_size, desc.scale_factor, |c| {
                    self.sources.source_for(level, c)
                })
                .map_err(|source| PlanError::Grid { level, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pyramid::new(grids, self.markers.clone())?)
    }
}
