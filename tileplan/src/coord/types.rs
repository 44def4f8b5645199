//! Coordinate type definitions

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Integer 2D vector used as a pixel position, a pixel size, or a grid index.
///
/// No operation clamps implicitly. Callers that need bounds (the viewport,
/// the ring walk) clamp or filter explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    /// Horizontal component, growing to the right
    pub x: i32,
    /// Vertical component, growing downwards
    pub y: i32,
}

impl Coordinate {
    /// The origin `(0, 0)`.
    pub const ZERO: Coordinate = Coordinate { x: 0, y: 0 };

    /// Creates a coordinate from its components.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this coordinate moved by `(dx, dy)`.
    #[inline]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean length of the vector.
    #[inline]
    pub fn magnitude(self) -> f64 {
        let x = self.x as f64;
        let y = self.y as f64;
        (x * x + y * y).sqrt()
    }

    /// Euclidean distance between two coordinates.
    #[inline]
    pub fn distance(self, other: Coordinate) -> f64 {
        (self - other).magnitude()
    }

    /// Component-wise multiplication (grid dimension times tile size).
    #[inline]
    pub const fn scale_by(self, other: Coordinate) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    /// Component-wise integer division. Returns `None` if either divisor is zero.
    #[inline]
    pub fn checked_div_by(self, other: Coordinate) -> Option<Self> {
        Some(Self {
            x: self.x.checked_div(other.x)?,
            y: self.y.checked_div(other.y)?,
        })
    }

    /// Multiplies both components by a float factor, truncating toward zero.
    #[inline]
    pub fn scale_truncated(self, factor: f32) -> Self {
        Self {
            x: (self.x as f32 * factor) as i32,
            y: (self.y as f32 * factor) as i32,
        }
    }

    /// True if `0 <= x < bounds.x` and `0 <= y < bounds.y`.
    #[inline]
    pub const fn is_within(self, bounds: Coordinate) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < bounds.x && self.y < bounds.y
    }

    /// Number of cells in a `x * y` area, zero for non-positive extents.
    #[inline]
    pub fn area(self) -> usize {
        if self.x <= 0 || self.y <= 0 {
            0
        } else {
            self.x as usize * self.y as usize
        }
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn add(self, rhs: Coordinate) -> Coordinate {
        self.translate(rhs.x, rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn mul(self, rhs: i32) -> Coordinate {
        Coordinate::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i32> for Coordinate {
    type Output = Coordinate;

    /// Integer division per component.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero.
    #[inline]
    fn div(self, rhs: i32) -> Coordinate {
        Coordinate::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
