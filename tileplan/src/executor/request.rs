//! A single pending tile load.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::coord::Coordinate;
use crate::grid::TileGrid;

/// One tile to materialize, issued by a scheduling pass.
///
/// All requests of a pass carry children of the pass token, so cancelling
/// the pass cancels every request it issued.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub grid: Arc<TileGrid>,
    /// Pyramid level of `grid`, reported back to the sink
    pub level: usize,
    pub coordinate: Coordinate,
    pub cancellation: CancellationToken,
}

impl LoadRequest {
    pub fn new(
        grid: Arc<TileGrid>,
        level: usize,
        coordinate: Coordinate,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            grid,
            level,
            coordinate,
            cancellation,
        }
    }
}
