//! Read-only view of the resident tiles of a grid.

use super::TileGrid;
use crate::coord::Coordinate;
use crate::tile::Tile;

/// Same-shaped view of a [`TileGrid`] in which unloaded tiles are absent.
///
/// Captured once; later loads or evictions on the grid are not reflected in
/// which cells are present.
#[derive(Debug)]
pub struct LoadedSnapshot<'a> {
    dimension: Coordinate,
    cells: Vec<Option<&'a Tile>>,
}

impl<'a> LoadedSnapshot<'a> {
    pub(super) fn capture(grid: &'a TileGrid) -> Self {
        Self {
            dimension: grid.dimension(),
            cells: grid
                .tiles()
                .map(|(_, tile)| tile.is_loaded().then_some(tile))
                .collect(),
        }
    }

    pub fn dimension(&self) -> Coordinate {
        self.dimension
    }

    /// The tile at `c` if it was loaded when the snapshot was taken.
    pub fn get(&self, c: Coordinate) -> Option<&'a Tile> {
        if !c.is_within(self.dimension) {
            return None;
        }
        self.cells[c.x as usize * self.dimension.y as usize + c.y as usize]
    }

    /// Loaded tiles in scan order, `x` outer and `y` inner.
    pub fn loaded(&self) -> impl Iterator<Item = (Coordinate, &'a Tile)> + '_ {
        let rows = self.dimension.y;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let i = i as i32;
            cell.map(|tile| (Coordinate::new(i / rows, i % rows), tile))
        })
    }

    /// Number of loaded tiles in the snapshot.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
