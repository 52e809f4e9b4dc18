//! Nearest-walkable snapping.
//!
//! Queries frequently originate at points that are not on the track (a car
//! that slid into the wall, a click on the grass). Snapping replaces such a
//! point with the center of the nearest walkable cell so the search still has
//! a usable endpoint.

use crate::map::grid::TrackGrid;
use crate::map::point::{CellCoord, WorldPoint};

/// Finds the nearest walkable cell center within `max_radius_px` of `point`.
///
/// If the cell containing `point` is walkable its center is returned
/// directly. Otherwise the search expands in square rings of increasing
/// Chebyshev radius, visiting only each ring's perimeter cells, and returns
/// the first walkable cell found. Within a ring, scan order decides ties —
/// the result is nearest-ring, not nearest-Euclidean.
///
/// Returns `None` when no walkable cell exists within
/// `ceil(max_radius_px / cell_size)` rings. That is an expected outcome, not
/// an error; callers choose whether to fall back to the unsnapped point or
/// drop the query.
pub fn nearest_walkable(
    grid: &TrackGrid,
    point: WorldPoint,
    max_radius_px: u32,
) -> Option<WorldPoint> {
    let origin = grid.world_to_cell(point);
    if grid.is_walkable(origin) {
        return Some(grid.cell_to_world(origin));
    }

    let max_rings = max_radius_px.div_ceil(grid.cell_size()) as isize;
    for radius in 1..=max_rings {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                // perimeter cells only; the interior was covered by smaller rings
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let row = origin.row as isize + dy;
                let col = origin.col as isize + dx;
                if grid.is_walkable_signed(row, col) {
                    return Some(grid.cell_to_world(CellCoord::new(row as usize, col as usize)));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::classify::WalkabilityRule;
    use image::{Rgb, RgbImage};

    fn dark_road_rule() -> WalkabilityRule {
        WalkabilityRule::BrightnessBelow { threshold: 150.0 }
    }

    /// 64x64 image, all light (blocked) except one dark 4x4 cell block.
    fn single_road_cell(row: u32, col: u32) -> TrackGrid {
        let mut image = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
        for y in row * 4..row * 4 + 4 {
            for x in col * 4..col * 4 + 4 {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap()
    }

    #[test]
    fn test_walkable_point_snaps_to_own_cell_center() {
        let grid = single_road_cell(5, 5);
        let snapped = nearest_walkable(&grid, WorldPoint::new(21.0, 23.0), 40).unwrap();
        assert_eq!((snapped.x, snapped.y), (22.0, 22.0));
    }

    #[test]
    fn test_snaps_to_nearest_ring() {
        let grid = single_road_cell(5, 8);
        // query sits in cell (5, 5); the road cell is 3 rings out
        let snapped = nearest_walkable(&grid, WorldPoint::new(22.0, 22.0), 40).unwrap();
        assert_eq!((snapped.x, snapped.y), (34.0, 22.0));
    }

    #[test]
    fn test_radius_limits_the_search() {
        let grid = single_road_cell(5, 8);
        // 3 cells away but the budget only covers 2 rings (8 px / 4 px)
        assert!(nearest_walkable(&grid, WorldPoint::new(22.0, 22.0), 8).is_none());
        // ceil(9 / 4) = 3 rings reaches it
        assert!(nearest_walkable(&grid, WorldPoint::new(22.0, 22.0), 9).is_some());
    }

    #[test]
    fn test_fully_blocked_grid_snaps_nothing() {
        let image = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
        let grid = TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap();
        assert!(nearest_walkable(&grid, WorldPoint::new(32.0, 32.0), 200).is_none());
    }
}
