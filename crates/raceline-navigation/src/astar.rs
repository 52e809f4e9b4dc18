//! A* search over the walkability grid.
//!
//! One search core serves both query styles the engine offers. Connectivity
//! (4- or 8-neighborhood) and the search region (a clamped window around the
//! start, or the whole grid) are explicit parameters instead of separate
//! implementations:
//!
//! * [`astar_search_windowed`] — 8-connected, Euclidean step costs, restricted
//!   to a square window around the start cell. Windowing bounds the worst-case
//!   cost of frequent localized replans regardless of track size.
//! * [`astar_search_grid`] — whole-grid search with unit step costs, intended
//!   for one-shot long-range queries (4-connected for the checkpoint planner).
//!
//! Failure is always the empty path, never an error: search runs on the hot
//! path and callers are expected to branch on emptiness.

use crate::map::grid::TrackGrid;
use crate::map::point::{CellCoord, WorldPoint};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

/// Neighborhood shape used when expanding a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Orthogonal neighbors only, unit step cost.
    FourWay,
    /// Orthogonal and diagonal neighbors; diagonal steps cost `sqrt(2)`.
    EightWay,
}

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::FourWay => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Connectivity::EightWay => &[
                (-1, 0),
                (1, 0),
                (0, -1),
                (0, 1),
                (-1, -1),
                (-1, 1),
                (1, -1),
                (1, 1),
            ],
        }
    }

    fn step_cost(self, dr: isize, dc: isize) -> f32 {
        if dr != 0 && dc != 0 { SQRT_2 } else { 1.0 }
    }
}

/// Rectangular search region in global cell coordinates.
///
/// Local storage indices are row-major within the region, so g-scores and
/// predecessors live in flat, region-sized vectors.
#[derive(Debug, Clone, Copy)]
struct Region {
    r0: usize,
    c0: usize,
    rows: usize,
    cols: usize,
}

impl Region {
    fn whole_grid(grid: &TrackGrid) -> Self {
        Region {
            r0: 0,
            c0: 0,
            rows: grid.rows(),
            cols: grid.cols(),
        }
    }

    /// Square window of the given half-width around `center`, clamped to the
    /// grid. The center cell is always inside the result.
    fn around(grid: &TrackGrid, center: CellCoord, half_width: usize) -> Self {
        let r0 = center.row.saturating_sub(half_width);
        let c0 = center.col.saturating_sub(half_width);
        let r1 = (center.row + half_width).min(grid.rows() - 1);
        let c1 = (center.col + half_width).min(grid.cols() - 1);
        Region {
            r0,
            c0,
            rows: r1 - r0 + 1,
            cols: c1 - c0 + 1,
        }
    }

    fn contains(&self, cell: CellCoord) -> bool {
        cell.row >= self.r0
            && cell.row < self.r0 + self.rows
            && cell.col >= self.c0
            && cell.col < self.c0 + self.cols
    }

    /// Local row-major index. The caller guarantees `self.contains(cell)`.
    fn local_index(&self, cell: CellCoord) -> usize {
        (cell.row - self.r0) * self.cols + (cell.col - self.c0)
    }

    /// First walkable cell in row-major scan order, if any.
    fn first_walkable(&self, grid: &TrackGrid) -> Option<CellCoord> {
        (self.r0..self.r0 + self.rows)
            .flat_map(|row| (self.c0..self.c0 + self.cols).map(move |col| CellCoord::new(row, col)))
            .find(|&cell| grid.is_walkable(cell))
    }
}

/// Entry in the open set, ordered by lowest `f = g + h` first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenNode {
    f: f32,
    cell: CellCoord,
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed for BinaryHeap to act as a min-heap; ties broken by cell
        // so the ordering is total
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Straight-line distance between two cells, in cell units.
///
/// Admissible for both step-cost models (unit orthogonal moves and
/// `sqrt(2)` diagonals), so the search stays optimal in either mode.
fn euclidean(a: CellCoord, b: CellCoord) -> f32 {
    let dr = a.row.abs_diff(b.row) as f32;
    let dc = a.col.abs_diff(b.col) as f32;
    (dr * dr + dc * dc).sqrt()
}

/// A* core over one region. `start` must lie inside the region and be
/// walkable; the path is empty when the open set drains before `goal` is
/// reached (including when `goal` lies outside the region).
fn search_region(
    grid: &TrackGrid,
    region: Region,
    start: CellCoord,
    goal: CellCoord,
    connectivity: Connectivity,
) -> Vec<CellCoord> {
    let n = region.rows * region.cols;
    let mut g_score = vec![f32::INFINITY; n];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; n];
    let mut settled = vec![false; n];

    let mut open = BinaryHeap::new();
    g_score[region.local_index(start)] = 0.0;
    open.push(OpenNode {
        f: euclidean(start, goal),
        cell: start,
    });

    while let Some(OpenNode { cell: current, .. }) = open.pop() {
        let current_index = region.local_index(current);
        if settled[current_index] {
            continue;
        }
        settled[current_index] = true;

        if current == goal {
            return reconstruct_path(region, &came_from, current);
        }

        for &(dr, dc) in connectivity.offsets() {
            let row = current.row as isize + dr;
            let col = current.col as isize + dc;
            if !grid.is_walkable_signed(row, col) {
                continue;
            }
            let neighbor = CellCoord::new(row as usize, col as usize);
            if !region.contains(neighbor) {
                continue;
            }
            let neighbor_index = region.local_index(neighbor);
            if settled[neighbor_index] {
                continue;
            }

            let tentative = g_score[current_index] + connectivity.step_cost(dr, dc);
            if tentative < g_score[neighbor_index] {
                g_score[neighbor_index] = tentative;
                came_from[neighbor_index] = Some(current);
                open.push(OpenNode {
                    f: tentative + euclidean(neighbor, goal),
                    cell: neighbor,
                });
            }
        }
    }

    Vec::new()
}

/// Walks predecessor links back from `current` and reverses the result.
fn reconstruct_path(
    region: Region,
    came_from: &[Option<CellCoord>],
    mut current: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![current];
    while let Some(previous) = came_from[region.local_index(current)] {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Keeps a walkable cell as-is; otherwise substitutes the first walkable cell
/// of the region in row-major scan order.
fn walkable_or_region_fallback(
    grid: &TrackGrid,
    region: Region,
    cell: CellCoord,
) -> Option<CellCoord> {
    if grid.is_walkable(cell) {
        Some(cell)
    } else {
        region.first_walkable(grid)
    }
}

/// Windowed 8-connected search between two world points.
///
/// The window is a square of half-width `max(3, ceil(radius_px / cell_size))`
/// cells centered on the start cell, clamped to the grid. A start or goal
/// that lands on a non-walkable cell falls back to the first walkable cell in
/// row-major scan order within the window; if the window holds no walkable
/// cell at all, the path is empty. A walkable goal beyond the window is kept
/// but cannot be reached, which also yields an empty path — the window is the
/// query's whole world.
///
/// The returned path visits cell centers in world coordinates, from the
/// (possibly substituted) start to the goal.
pub fn astar_search_windowed(
    grid: &TrackGrid,
    start_world: WorldPoint,
    goal_world: WorldPoint,
    radius_px: u32,
) -> Vec<WorldPoint> {
    let start_cell = grid.world_to_cell(start_world);
    let goal_cell = grid.world_to_cell(goal_world);

    let half_width = (radius_px.div_ceil(grid.cell_size()) as usize).max(3);
    let window = Region::around(grid, start_cell, half_width);

    let Some(start) = walkable_or_region_fallback(grid, window, start_cell) else {
        return Vec::new();
    };
    let Some(goal) = walkable_or_region_fallback(grid, window, goal_cell) else {
        return Vec::new();
    };

    search_region(grid, window, start, goal, Connectivity::EightWay)
        .into_iter()
        .map(|cell| grid.cell_to_world(cell))
        .collect()
}

/// Whole-grid search between two cells.
///
/// Unlike the windowed variant there is no endpoint substitution: a
/// non-walkable start or goal simply has no path.
pub fn astar_search_grid(
    grid: &TrackGrid,
    start: CellCoord,
    goal: CellCoord,
    connectivity: Connectivity,
) -> Vec<CellCoord> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return Vec::new();
    }
    search_region(grid, Region::whole_grid(grid), start, goal, connectivity)
}
