//! Load ordering: which tiles a pass submits, and in what order.

use crate::coord::{calculate_neighbours, Coordinate};
use crate::grid::TileGrid;
use crate::viewport::Viewport;

/// Loading radius in tiles: half the longer viewport axis divided by the
/// tile extent on that axis.
///
/// When width equals height the y axis is used.
pub fn loading_level(viewport_size: Coordinate, tile_size: Coordinate) -> i32 {
    if viewport_size.x > viewport_size.y {
        (viewport_size.x / 2) / tile_size.x
    } else {
        (viewport_size.y / 2) / tile_size.y
    }
}

/// Tile under the viewport's focal pixel.
pub fn calculate_center_tile(viewport: &Viewport, grid: &TileGrid) -> Coordinate {
    let center = viewport.center(grid.size());
    let tile_size = grid.tile_size();
    Coordinate::new(center.x / tile_size.x, center.y / tile_size.y)
}

/// Every coordinate a pass over `(grid, viewport)` submits, in submission
/// order: the center tile, then rings of increasing Chebyshev distance up to
/// the loading radius.
pub fn load_order(grid: &TileGrid, viewport: &Viewport) -> Vec<Coordinate> {
    let radius = loading_level(viewport.size(), grid.tile_size());
    let center = calculate_center_tile(viewport, grid);
    calculate_neighbours(center, grid.dimension(), radius)
}
