//! Integer grid geometry.
//!
//! Provides the [`Coordinate`] vector type and the square-ring walk used to
//! order tile loads outward from a center tile.

mod types;

pub use types::Coordinate;

/// Returns the tiles on the square ring at Chebyshev distance `level` from
/// `center`, in walk order, skipping any outside `[0, dimension)`.
///
/// The walk starts at `(center.x + level, center.y - level)`, runs down the
/// right edge, left along the bottom edge, up the left edge, and right along
/// the top edge, stopping just before the start corner. Every ring cell is
/// visited exactly once. `level == 0` yields nothing; the center itself is
/// handled by [`calculate_neighbours`].
pub fn neighbours_of_level(
    center: Coordinate,
    dimension: Coordinate,
    level: i32,
) -> Vec<Coordinate> {
    if level <= 0 {
        return Vec::new();
    }

    let mut ring = Vec::with_capacity(8 * level as usize);
    let mut push = |x: i32, y: i32| {
        let c = Coordinate::new(center.x + x, center.y + y);
        if c.is_within(dimension) {
            ring.push(c);
        }
    };

    // Right edge, top to bottom (bottom corner excluded)
    for y in -level..level {
        push(level, y);
    }
    // Bottom edge, right to left
    for x in ((-level + 1)..=level).rev() {
        push(x, level);
    }
    // Left edge, bottom to top
    for y in ((-level + 1)..=level).rev() {
        push(-level, y);
    }
    // Top edge, left to right
    for x in -level..level {
        push(x, -level);
    }

    ring
}

/// Returns the full loading order for a pass: `center` first, then every
/// ring from 1 to `radius` inclusive.
///
/// Coordinates outside `[0, dimension)` are skipped and never counted.
pub fn calculate_neighbours(
    center: Coordinate,
    dimension: Coordinate,
    radius: i32,
) -> Vec<Coordinate> {
    let radius = radius.max(0);
    let mut order = Vec::with_capacity(ring_capacity(radius));

    if center.is_within(dimension) {
        order.push(center);
    }
    for level in 1..=radius {
        order.extend(neighbours_of_level(center, dimension, level));
    }

    order
}

/// Size of the full square of side `2 * radius + 1`.
fn ring_capacity(radius: i32) -> usize {
    let side = 2 * radius as usize + 1;
    side * side
}
