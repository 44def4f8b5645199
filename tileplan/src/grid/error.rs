//! Grid construction and query errors.

use crate::coord::Coordinate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid dimension {dimension} must be positive on both axes")]
    EmptyDimension { dimension: Coordinate },

    #[error("tile size {tile_size} must be positive on both axes")]
    InvalidTileSize { tile_size: Coordinate },

    #[error("scale factor {scale_factor} must be a positive finite number")]
    InvalidScale { scale_factor: f32 },

    #[error("expected {expected} tiles, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("tile of size {actual} in a grid of {expected} tiles")]
    NonUniformTileSize {
        expected: Coordinate,
        actual: Coordinate,
    },

    #[error("area at {origin} with extent {extent} is outside grid of dimension {dimension}")]
    OutOfBounds {
        origin: Coordinate,
        extent: Coordinate,
        dimension: Coordinate,
    },
}
