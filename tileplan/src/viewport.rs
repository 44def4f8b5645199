//! Visible window into the active tile grid.

use crate::coord::Coordinate;

/// The visible pixel region of the active grid.
///
/// After every mutation the position satisfies, per axis:
/// `position + size <= grid_size` when the grid is at least as large as the
/// viewport, and `position >= 0` always. The far edge is clamped first and the
/// near edge second, so a grid smaller than the viewport pins the position
/// to zero on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    position: Coordinate,
    size: Coordinate,
}

impl Viewport {
    /// Creates a viewport at the origin with the given display size.
    pub fn new(size: Coordinate) -> Self {
        Self {
            position: Coordinate::ZERO,
            size,
        }
    }

    /// Creates a viewport at `position`, clamped against `grid_size`.
    pub fn with_position(position: Coordinate, size: Coordinate, grid_size: Coordinate) -> Self {
        let mut viewport = Self { position, size };
        viewport.check_position(grid_size);
        viewport
    }

    /// Top-left visible pixel offset into the grid.
    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Visible pixel extent.
    pub fn size(&self) -> Coordinate {
        self.size
    }

    /// Pans by `(dx, dy)` pixels and re-validates against `grid_size`.
    pub fn translate(&mut self, dx: i32, dy: i32, grid_size: Coordinate) {
        self.position = self.position.translate(dx, dy);
        self.check_position(grid_size);
    }

    /// Moves to an absolute position and re-validates against `grid_size`.
    pub fn set_position(&mut self, position: Coordinate, grid_size: Coordinate) {
        self.position = position;
        self.check_position(grid_size);
    }

    /// Changes the visible extent (display resize) and re-validates.
    pub fn resize(&mut self, size: Coordinate, grid_size: Coordinate) {
        self.size = size;
        self.check_position(grid_size);
    }

    /// Focal pixel of the viewport in grid space.
    ///
    /// On an axis where the grid is at least as large as the viewport the
    /// viewport's own half-size is used; otherwise half the grid extent, so a
    /// small plan stays centered.
    pub fn center(&self, grid_size: Coordinate) -> Coordinate {
        let half_x = if grid_size.x >= self.size.x {
            self.size.x / 2
        } else {
            grid_size.x / 2
        };
        let half_y = if grid_size.y >= self.size.y {
            self.size.y / 2
        } else {
            grid_size.y / 2
        };
        self.position.translate(half_x, half_y)
    }

    fn check_position(&mut self, grid_size: Coordinate) {
        if self.position.x + self.size.x > grid_size.x {
            self.position.x = grid_size.x - self.size.x;
        }
        if self.position.x < 0 {
            self.position.x = 0;
        }
        if self.position.y + self.size.y > grid_size.y {
            self.position.y = grid_size.y - self.size.y;
        }
        if self.position.y < 0 {
            self.position.y = 0;
        }
    }
}
