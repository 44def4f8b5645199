//! Zoom transition arithmetic.
//!
//! Switching levels keeps the pixel under the viewport's focal center in
//! place: the position is scaled by the ratio of the two levels' scale
//! factors and shifted by the half-viewport times that ratio minus one.

use std::fmt;
use std::str::FromStr;

use crate::coord::Coordinate;

/// Direction of a zoom step through the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomDirection {
    /// Towards the more detailed (higher index) level
    In,
    /// Towards the less detailed (lower index) level
    Out,
}

impl fmt::Display for ZoomDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomDirection::In => write!(f, "in"),
            ZoomDirection::Out => write!(f, "out"),
        }
    }
}

impl FromStr for ZoomDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "+" => Ok(ZoomDirection::In),
            "out" | "-" => Ok(ZoomDirection::Out),
            other => Err(format!("invalid zoom direction '{}', expected 'in' or 'out'", other)),
        }
    }
}

/// Level reached by one step in `direction` from `active`, or `None` at
/// either end of the pyramid.
pub fn target_level(active: usize, level_count: usize, direction: ZoomDirection) -> Option<usize> {
    match direction {
        ZoomDirection::In if active + 1 < level_count => Some(active + 1),
        ZoomDirection::Out if active > 0 && active < level_count => Some(active - 1),
        _ => None,
    }
}

/// Viewport position after rescaling by `relative_scale`.
///
/// `new = old * s + (size / 2) * (s - 1)` per axis, with the half size
/// integer-divided and the result truncated.
pub fn remap_position(
    old_position: Coordinate,
    relative_scale: f32,
    viewport_size: Coordinate,
) -> Coordinate {
    let half = viewport_size / 2;
    let remap = |old: i32, half: i32| {
        (old as f32 * relative_scale + half as f32 * (relative_scale - 1.0)) as i32
    };
    Coordinate::new(remap(old_position.x, half.x), remap(old_position.y, half.y))
}
