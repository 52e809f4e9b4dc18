#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a grid cell by its indices (row-major).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellCoord {
    /// The row index in the grid.
    pub row: usize,
    /// The column index in the grid.
    pub col: usize,
}

impl CellCoord {
    /// Creates a new `CellCoord`.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Represents a point in world coordinates (source-image pixels).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate in pixels.
    pub x: f32,
    /// The y-coordinate in pixels.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
