//! One zoom level of the pyramid: a fully populated 2D array of tiles.

mod error;
mod snapshot;

pub use error::GridError;
pub use snapshot::LoadedSnapshot;

use crate::coord::Coordinate;
use crate::tile::{SourceRef, Tile};

/// A grid of uniformly sized tiles at one scale factor.
///
/// Tiles are stored column-major so that whole-grid scans run with `x` as
/// the outer loop and `y` as the inner loop.
#[derive(Debug)]
pub struct TileGrid {
    dimension: Coordinate,
    tile_size: Coordinate,
    scale_factor: f32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Builds a grid from tiles supplied in column-major order.
    ///
    /// # Errors
    ///
    /// Fails if the dimension or tile size is not positive, if the scale
    /// factor is not a positive finite number, if the tile count does not
    /// match the dimension, or if any tile's size differs from `tile_size`.
    pub fn new(
        dimension: Coordinate,
        tile_size: Coordinate,
        scale_factor: f32,
        tiles: Vec<Tile>,
    ) -> Result<Self, GridError> {
        if dimension.x <= 0 || dimension.y <= 0 {
            return Err(GridError::EmptyDimension { dimension });
        }
        if tile_size.x <= 0 || tile_size.y <= 0 {
            return Err(GridError::InvalidTileSize { tile_size });
        }
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return Err(GridError::InvalidScale { scale_factor });
        }
        let expected = dimension.area();
        if tiles.len() != expected {
            return Err(GridError::TileCountMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        if let Some(tile) = tiles.iter().find(|t| t.size() != tile_size) {
            return Err(GridError::NonUniformTileSize {
                expected: tile_size,
                actual: tile.size(),
            });
        }

        Ok(Self {
            dimension,
            tile_size,
            scale_factor,
            tiles,
        })
    }

    /// Builds a grid, asking `source_for` for each tile's source reference.
    pub fn from_sources<F>(
        dimension: Coordinate,
        tile_size: Coordinate,
        scale_factor: f32,
        mut source_for: F,
    ) -> Result<Self, GridError>
    where
        F: FnMut(Coordinate) -> SourceRef,
    {
        let mut tiles = Vec::with_capacity(dimension.area());
        for x in 0..dimension.x.max(0) {
            for y in 0..dimension.y.max(0) {
                tiles.push(Tile::new(tile_size, source_for(Coordinate::new(x, y))));
            }
        }
        Self::new(dimension, tile_size, scale_factor, tiles)
    }

    /// Pixel size of the whole grid.
    pub fn size(&self) -> Coordinate {
        self.dimension.scale_by(self.tile_size)
    }

    /// Number of columns and rows.
    pub fn dimension(&self) -> Coordinate {
        self.dimension
    }

    pub fn tile_size(&self) -> Coordinate {
        self.tile_size
    }

    /// Scale relative to the pyramid's reference level (1.0).
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// The tile at grid index `c`, or `None` if out of range.
    pub fn tile(&self, c: Coordinate) -> Option<&Tile> {
        self.index_of(c).map(|i| &self.tiles[i])
    }

    /// All tiles with their coordinates, `x` outer and `y` inner.
    pub fn tiles(&self) -> impl Iterator<Item = (Coordinate, &Tile)> {
        let rows = self.dimension.y;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let i = i as i32;
            (Coordinate::new(i / rows, i % rows), tile)
        })
    }

    /// The `dx` by `dy` block of tiles whose top-left index is `(x, y)`,
    /// indexed as `area[column][row]`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the block is empty or leaves the grid.
    pub fn area(&self, x: i32, y: i32, dx: i32, dy: i32) -> Result<Vec<Vec<&Tile>>, GridError> {
        let origin = Coordinate::new(x, y);
        let far = Coordinate::new(x + dx - 1, y + dy - 1);
        if dx <= 0
            || dy <= 0
            || !origin.is_within(self.dimension)
            || !far.is_within(self.dimension)
        {
            return Err(GridError::OutOfBounds {
                origin,
                extent: Coordinate::new(dx, dy),
                dimension: self.dimension,
            });
        }

        Ok((x..x + dx)
            .map(|col| {
                (y..y + dy)
                    .filter_map(|row| self.tile(Coordinate::new(col, row)))
                    .collect()
            })
            .collect())
    }

    /// Same-shaped view exposing only tiles resident at the time of the call.
    pub fn loaded_snapshot(&self) -> LoadedSnapshot<'_> {
        LoadedSnapshot::capture(self)
    }

    /// Number of tiles currently holding a payload.
    pub fn loaded_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_loaded()).count()
    }

    /// Total payload bytes resident in this grid.
    pub fn resident_bytes(&self) -> usize {
        self.tiles.iter().map(Tile::resident_bytes).sum()
    }

    /// Drops every payload in the grid. Returns how many tiles were unloaded.
    pub fn forget_all(&self) -> usize {
        self.tiles.iter().filter_map(Tile::forget).count()
    }

    fn index_of(&self, c: Coordinate) -> Option<usize> {
        c.is_within(self.dimension)
            .then(|| c.x as usize * self.dimension.y as usize + c.y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::RasterBuffer;
    use image::RgbaImage;

    fn grid(w: i32, h: i32) -> TileGrid {
        TileGrid::from_sources(Coordinate::new(w, h), Coordinate::new(200, 200), 1.0, |c| {
            SourceRef::new(format!("{}_{}.png", c.x, c.y))
        })
        .unwrap()
    }

    fn load(grid: &TileGrid, x: i32, y: i32) {
        grid.tile(Coordinate::new(x, y))
            .unwrap()
            .store(RasterBuffer::new(RgbaImage::new(2, 2)));
    }

    #[test]
    fn test_derived_sizes() {
        let grid = grid(10, 4);
        assert_eq!(grid.dimension(), Coordinate::new(10, 4));
        assert_eq!(grid.tile_size(), Coordinate::new(200, 200));
        assert_eq!(grid.size(), Coordinate::new(2000, 800));
        assert_eq!(grid.scale_factor(), 1.0);
    }

    #[test]
    fn test_tile_lookup() {
        let grid = grid(3, 2);
        assert_eq!(grid.tile(Coordinate::new(2, 1)).unwrap().source().as_str(), "2_1.png");
        assert!(grid.tile(Coordinate::new(3, 0)).is_none());
        assert!(grid.tile(Coordinate::new(0, -1)).is_none());
    }

    #[test]
    fn test_tiles_iterate_column_major() {
        let grid = grid(2, 3);
        let order: Vec<_> = grid.tiles().map(|(c, _)| (c.x, c.y)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_rejects_empty_dimension() {
        let err =
            TileGrid::new(Coordinate::new(0, 3), Coordinate::new(1, 1), 1.0, vec![]).unwrap_err();
        assert!(matches!(err, GridError::EmptyDimension { .. }));
    }

    #[test]
    fn test_rejects_tile_count_mismatch() {
        let tiles = vec![Tile::new(Coordinate::new(1, 1), SourceRef::new("a"))];
        let err =
            TileGrid::new(Coordinate::new(2, 1), Coordinate::new(1, 1), 1.0, tiles).unwrap_err();
        assert!(matches!(err, GridError::TileCountMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_rejects_non_uniform_tiles() {
        let tiles = vec![
            Tile::new(Coordinate::new(1, 1), SourceRef::new("a")),
            Tile::new(Coordinate::new(2, 1), SourceRef::new("b")),
        ];
        let err =
            TileGrid::new(Coordinate::new(2, 1), Coordinate::new(1, 1), 1.0, tiles).unwrap_err();
        assert!(matches!(err, GridError::NonUniformTileSize { .. }));
    }

    #[test]
    fn test_rejects_bad_scale() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let one = Coordinate::new(1, 1);
            let result = TileGrid::from_sources(one, one, scale, |_| SourceRef::new("a"));
            assert!(matches!(result, Err(GridError::InvalidScale { .. })), "scale {scale}");
        }
    }

    #[test]
    fn test_area() {
        let grid = grid(5, 5);
        let area = grid.area(1, 2, 3, 2).unwrap();
        assert_eq!(area.len(), 3);
        assert!(area.iter().all(|column| column.len() == 2));
        assert_eq!(area[0][0].source().as_str(), "1_2.png");
        assert_eq!(area[2][1].source().as_str(), "3_3.png");
    }

    #[test]
    fn test_area_out_of_bounds() {
        let grid = grid(5, 5);
        assert!(grid.area(4, 4, 2, 1).is_err());
        assert!(grid.area(0, 0, 0, 1).is_err());
        assert!(grid.area(-1, 0, 1, 1).is_err());
        assert!(grid.area(4, 4, 1, 1).is_ok());
    }

    #[test]
    fn test_loaded_accounting() {
        let grid = grid(4, 4);
        assert_eq!(grid.loaded_count(), 0);
        load(&grid, 0, 0);
        load(&grid, 3, 2);
        assert_eq!(grid.loaded_count(), 2);
        assert_eq!(grid.resident_bytes(), 2 * 2 * 2 * 4);

        assert_eq!(grid.forget_all(), 2);
        assert_eq!(grid.loaded_count(), 0);
    }
}
