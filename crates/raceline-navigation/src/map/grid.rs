//! Walkability grid rasterized from a track image.
//!
//! The grid divides the source image into square cells of a fixed pixel size
//! and stores one walkability bit per cell, taken from the classifier's
//! verdict on the pixel at the cell's center. It is built once at startup and
//! never mutated afterwards, so any number of concurrent searches may read it
//! without synchronization.

use crate::error::NavError;
use crate::map::classify::WalkabilityRule;
use crate::map::point::{CellCoord, WorldPoint};
use image::RgbImage;
use rand::seq::IndexedRandom;

/// Immutable walkability map over a track image.
///
/// Invariants: `rows == ceil(height / cell_size)`,
/// `cols == ceil(width / cell_size)`, and `cells.len() == rows * cols`
/// (row-major).
#[derive(Debug, Clone)]
pub struct TrackGrid {
    /// Source image width in pixels.
    width: u32,
    /// Source image height in pixels.
    height: u32,
    /// Cell edge length in pixels.
    cell_size: u32,
    rows: usize,
    cols: usize,
    /// Row-major walkability bitmap.
    cells: Vec<bool>,
}

impl TrackGrid {
    /// Rasterizes an image into a walkability grid.
    ///
    /// Every cell is classified from the single pixel at
    /// `(col * cell_size + cell_size / 2, row * cell_size + cell_size / 2)`,
    /// clamped into image bounds so edge cells sample their visible portion.
    ///
    /// # Arguments
    /// * `image` - The RGB track image.
    /// * `cell_size` - Cell edge length in pixels; must be positive.
    /// * `rule` - The walkability predicate applied to each sampled pixel.
    ///
    /// # Errors
    /// Returns `Err(NavError::InvalidCellSize)` if `cell_size` is zero and
    /// `Err(NavError::EmptyImage)` if the image has no pixels.
    pub fn from_image(
        image: &RgbImage,
        cell_size: u32,
        rule: &WalkabilityRule,
    ) -> Result<Self, NavError> {
        if cell_size == 0 {
            return Err(NavError::InvalidCellSize("must be positive"));
        }
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(NavError::EmptyImage("image has zero width or height"));
        }

        let rows = height.div_ceil(cell_size) as usize;
        let cols = width.div_ceil(cell_size) as usize;
        let mut cells = vec![false; rows * cols];

        for row in 0..rows {
            let py = (row as u32 * cell_size + cell_size / 2).min(height - 1);
            for col in 0..cols {
                let px = (col as u32 * cell_size + cell_size / 2).min(width - 1);
                cells[row * cols + col] = rule.is_walkable(image.get_pixel(px, py));
            }
        }

        Ok(TrackGrid {
            width,
            height,
            cell_size,
            rows,
            cols,
            cells,
        })
    }

    /// Source image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Source image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell edge length in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major index of a cell. The caller guarantees the cell is in bounds.
    pub(crate) fn index(&self, cell: CellCoord) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Whether the cell is inside the grid and classified walkable.
    ///
    /// Out-of-bounds coordinates are simply not walkable; searches and the
    /// snapper rely on this instead of carrying separate bounds checks.
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.cells[self.index(cell)]
    }

    /// Signed-coordinate variant of [`is_walkable`](Self::is_walkable), for
    /// neighbor offsets that may step below zero.
    pub fn is_walkable_signed(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && self.is_walkable(CellCoord::new(row as usize, col as usize))
    }

    /// Converts world coordinates to the containing cell, clamped into bounds.
    ///
    /// `(row, col) = (clamp(floor(y / cs), 0, rows-1), clamp(floor(x / cs), 0, cols-1))`
    pub fn world_to_cell(&self, point: WorldPoint) -> CellCoord {
        let cs = self.cell_size as f32;
        let row = ((point.y / cs).floor().max(0.0) as usize).min(self.rows - 1);
        let col = ((point.x / cs).floor().max(0.0) as usize).min(self.cols - 1);
        CellCoord::new(row, col)
    }

    /// Converts a cell to world coordinates (center of the cell).
    ///
    /// `(x, y) = ((col + 0.5) * cs, (row + 0.5) * cs)`
    pub fn cell_to_world(&self, cell: CellCoord) -> WorldPoint {
        let cs = self.cell_size as f32;
        WorldPoint::new((cell.col as f32 + 0.5) * cs, (cell.row as f32 + 0.5) * cs)
    }

    /// Number of walkable cells in the grid.
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&walkable| walkable).count()
    }

    /// Picks a uniformly random walkable cell, or `None` when the grid has no
    /// walkable cells.
    pub fn random_walkable_cell<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<CellCoord> {
        let walkable: Vec<CellCoord> = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| CellCoord::new(row, col)))
            .filter(|&cell| self.cells[self.index(cell)])
            .collect();
        walkable.choose(rng).copied()
    }
}
