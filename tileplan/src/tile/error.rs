//! Per-tile load failures.

use super::SourceRef;
use crate::coord::Coordinate;
use thiserror::Error;

/// Why a single tile could not be materialized.
///
/// Every variant is local to one tile: the tile stays unloaded and a later
/// pass over the same coordinate retries it.
#[derive(Debug, Error)]
pub enum TileLoadError {
    /// Source bytes could not be read
    #[error("failed to read tile source '{source_ref}': {error}")]
    Io {
        source_ref: SourceRef,
        #[source]
        error: std::io::Error,
    },

    /// Bytes were read but are not a valid raster
    #[error("failed to decode tile source '{source_ref}': {reason}")]
    Decode { source_ref: SourceRef, reason: String },

    /// The blocking worker running the load did not complete
    #[error("tile load for '{source_ref}' aborted: {reason}")]
    Aborted { source_ref: SourceRef, reason: String },

    /// No tile exists at the requested grid index
    #[error("no tile at {coordinate} in a grid of dimension {dimension}")]
    OutOfRange {
        coordinate: Coordinate,
        dimension: Coordinate,
    },
}

impl TileLoadError {
    /// The source the failure refers to, if a tile was resolved.
    pub fn source_ref(&self) -> Option<&SourceRef> {
        match self {
            Self::Io { source_ref, .. }
            | Self::Decode { source_ref, .. }
            | Self::Aborted { source_ref, .. } => Some(source_ref),
            Self::OutOfRange { .. } => None,
        }
    }

    /// Short label for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Decode { .. } => "decode",
            Self::Aborted { .. } => "aborted",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}
