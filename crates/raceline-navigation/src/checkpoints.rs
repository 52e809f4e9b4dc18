//! Checkpoint loop construction.
//!
//! A breadth-first flood fill from the spawn cell walks every reachable
//! walkable cell once; every `step_count`-th dequeued cell becomes a
//! checkpoint, and the first checkpoint is repeated at the end to close the
//! loop. The sequence follows fill order, not physical track order — an
//! accepted approximation that keeps construction a single linear pass.

use crate::map::grid::TrackGrid;
use crate::map::point::CellCoord;
use std::collections::VecDeque;

const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Builds the looped checkpoint sequence for a track.
///
/// # Arguments
/// * `grid` - The walkability grid to flood.
/// * `spawn` - Fill origin; when it is not walkable the result is empty.
/// * `step_count` - Sampling interval in dequeued cells; must be positive
///   (the context validates this at construction).
///
/// # Returns
/// Checkpoints in flood-fill order with the first one appended again at the
/// end, or an empty sequence when nothing reachable was sampled.
pub fn build_checkpoint_loop(
    grid: &TrackGrid,
    spawn: CellCoord,
    step_count: usize,
) -> Vec<CellCoord> {
    if step_count == 0 || !grid.is_walkable(spawn) {
        return Vec::new();
    }

    let mut visited = vec![false; grid.rows() * grid.cols()];
    let mut queue = VecDeque::new();
    visited[grid.index(spawn)] = true;
    queue.push_back(spawn);

    let mut checkpoints = Vec::new();
    let mut dequeued = 0usize;

    while let Some(cell) = queue.pop_front() {
        dequeued += 1;
        if dequeued % step_count == 0 {
            checkpoints.push(cell);
        }

        for (dr, dc) in NEIGHBORS {
            let row = cell.row as isize + dr;
            let col = cell.col as isize + dc;
            if !grid.is_walkable_signed(row, col) {
                continue;
            }
            let neighbor = CellCoord::new(row as usize, col as usize);
            if !visited[grid.index(neighbor)] {
                visited[grid.index(neighbor)] = true;
                queue.push_back(neighbor);
            }
        }
    }

    if let Some(&first) = checkpoints.first() {
        checkpoints.push(first);
    }
    checkpoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::classify::WalkabilityRule;
    use image::{Rgb, RgbImage};

    fn dark_road_rule() -> WalkabilityRule {
        WalkabilityRule::BrightnessBelow { threshold: 150.0 }
    }

    fn all_walkable_grid() -> TrackGrid {
        // 160x160 image at cell size 4 -> 40x40 all-walkable grid
        let image = RgbImage::from_pixel(160, 160, Rgb([0, 0, 0]));
        TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap()
    }

    #[test]
    fn test_count_tracks_visited_cells() {
        let grid = all_walkable_grid();
        let spawn = CellCoord::new(20, 20);
        let loop_points = build_checkpoint_loop(&grid, spawn, 5);

        // 1600 visited cells sampled every 5th, plus the closing repeat
        let sampled = loop_points.len() - 1;
        assert!(
            (sampled as isize - 320).unsigned_abs() <= 1,
            "expected about 320 checkpoints, got {}",
            sampled
        );
        assert_eq!(
            loop_points.first(),
            loop_points.last(),
            "loop must close on its first checkpoint"
        );
    }

    #[test]
    fn test_fill_respects_walls() {
        // two chambers; only the left one contains the spawn
        let mut image = RgbImage::from_pixel(36, 12, Rgb([0, 0, 0]));
        for y in 0..12 {
            for x in 16..20 {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let grid = TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap();
        let loop_points = build_checkpoint_loop(&grid, CellCoord::new(0, 0), 1);

        // left chamber is 3 rows x 4 cols; +1 for the closing repeat
        assert_eq!(loop_points.len(), 13);
        for cell in &loop_points {
            assert!(cell.col < 4, "fill leaked through the wall: {:?}", cell);
        }
    }

    #[test]
    fn test_unwalkable_spawn_yields_empty_loop() {
        let image = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        let grid = TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap();
        assert!(build_checkpoint_loop(&grid, CellCoord::new(5, 5), 5).is_empty());
    }

    #[test]
    fn test_step_larger_than_region_yields_empty_loop() {
        let mut image = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        image.put_pixel(2, 2, Rgb([0, 0, 0]));
        let grid = TrackGrid::from_image(&image, 4, &dark_road_rule()).unwrap();
        // one walkable cell, sampled every 10th dequeue: nothing qualifies
        assert!(build_checkpoint_loop(&grid, CellCoord::new(0, 0), 10).is_empty());
    }

    #[test]
    fn test_step_one_visits_every_reachable_cell() {
        let grid = all_walkable_grid();
        let loop_points = build_checkpoint_loop(&grid, CellCoord::new(0, 0), 1);
        assert_eq!(loop_points.len(), grid.walkable_count() + 1);
        assert_eq!(loop_points[0], CellCoord::new(0, 0));
    }
}
