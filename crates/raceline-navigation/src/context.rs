//! The track context: everything the engine derives from a track image,
//! built once at startup and read-only afterwards.
//!
//! Construction is the only fallible step. Once a [`TrackContext`] exists it
//! can be shared (`Arc`) across any number of concurrent query callers
//! without synchronization — nothing here mutates after construction, and
//! every query failure is an empty value rather than an error.

use crate::astar::{Connectivity, astar_search_grid, astar_search_windowed};
use crate::centerline::extract_centerline;
use crate::checkpoints::build_checkpoint_loop;
use crate::error::NavError;
use crate::map::classify::WalkabilityRule;
use crate::map::grid::TrackGrid;
use crate::map::point::{CellCoord, WorldPoint};
use image::RgbImage;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// These are the knobs the three track-engine deployments actually differ
/// in; everything else is fixed behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackConfig {
    /// Grid cell edge length in pixels.
    pub cell_size_px: u32,
    /// Pixel classification policy.
    pub rule: WalkabilityRule,
    /// Window radius for bounded replan queries, in pixels.
    pub window_radius_px: u32,
    /// Sampling interval of the checkpoint flood fill, in dequeued cells.
    pub checkpoint_step: usize,
    /// Vertical scanline step of the centerline extractor, in pixels.
    pub centerline_step_px: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        TrackConfig {
            cell_size_px: 4,
            rule: WalkabilityRule::BrightnessBelow { threshold: 150.0 },
            window_radius_px: 160,
            checkpoint_step: 40,
            centerline_step_px: 6,
        }
    }
}

/// Immutable navigation state for one track.
#[derive(Debug, Clone)]
pub struct TrackContext {
    grid: TrackGrid,
    centerline: Vec<WorldPoint>,
    checkpoints: Vec<CellCoord>,
    spawn: WorldPoint,
    window_radius_px: u32,
}

impl TrackContext {
    /// Builds the full navigation context from a track image.
    ///
    /// The grid is rasterized, the centerline extracted, and the checkpoint
    /// loop flooded from the spawn point (image center snapped to the nearest
    /// walkable cell; the raw center when nothing is walkable — the
    /// checkpoint loop is then empty but queries still answer).
    ///
    /// # Errors
    /// Returns a [`NavError`] when the configuration cannot produce a usable
    /// context: zero cell size, zero checkpoint step, zero scan step, or an
    /// empty image. Callers are expected to abort startup on any of these.
    pub fn new(image: &RgbImage, config: TrackConfig) -> Result<Self, NavError> {
        if config.checkpoint_step == 0 {
            return Err(NavError::InvalidCheckpointStep("must be positive"));
        }
        if config.centerline_step_px == 0 {
            return Err(NavError::InvalidScanStep("must be positive"));
        }

        let grid = TrackGrid::from_image(image, config.cell_size_px, &config.rule)?;
        let centerline = extract_centerline(image, &config.rule, config.centerline_step_px);

        let center = WorldPoint::new(grid.width() as f32 / 2.0, grid.height() as f32 / 2.0);
        let snap_budget = grid.width().max(grid.height());
        let spawn =
            crate::snap::nearest_walkable(&grid, center, snap_budget).unwrap_or(center);
        let checkpoints =
            build_checkpoint_loop(&grid, grid.world_to_cell(spawn), config.checkpoint_step);

        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            walkable = grid.walkable_count(),
            centerline_points = centerline.len(),
            checkpoints = checkpoints.len(),
            "track context built"
        );

        Ok(TrackContext {
            grid,
            centerline,
            checkpoints,
            spawn,
            window_radius_px: config.window_radius_px,
        })
    }

    /// The walkability grid.
    pub fn grid(&self) -> &TrackGrid {
        &self.grid
    }

    /// The cached centerline (never empty).
    pub fn centerline(&self) -> &[WorldPoint] {
        &self.centerline
    }

    /// The spawn point: image center snapped onto the track.
    pub fn spawn(&self) -> WorldPoint {
        self.spawn
    }

    /// The cached checkpoint loop.
    pub fn checkpoints(&self) -> &[CellCoord] {
        &self.checkpoints
    }

    /// Spawn point and checkpoint loop in one call.
    pub fn spawn_and_checkpoints(&self) -> (WorldPoint, &[CellCoord]) {
        (self.spawn, &self.checkpoints)
    }

    /// The configured window radius for bounded replans.
    pub fn window_radius_px(&self) -> u32 {
        self.window_radius_px
    }

    /// Snap-then-search replan between two world points.
    ///
    /// Both endpoints are snapped to the nearest walkable cell within
    /// `radius_px`; an endpoint that cannot be snapped is used as-is (its
    /// window fallback may still rescue the query). The search itself is the
    /// windowed 8-connected A*. An empty path means no route exists within
    /// the window — the caller decides whether and when to retry.
    pub fn compute_path(
        &self,
        start: WorldPoint,
        goal: WorldPoint,
        radius_px: u32,
    ) -> Vec<WorldPoint> {
        let start = crate::snap::nearest_walkable(&self.grid, start, radius_px).unwrap_or(start);
        let goal = crate::snap::nearest_walkable(&self.grid, goal, radius_px).unwrap_or(goal);
        astar_search_windowed(&self.grid, start, goal, radius_px)
    }

    /// Plans a route from an agent's cell to a checkpoint and returns the
    /// index to chase next.
    ///
    /// The agent cell is snapped onto the track first (cars drift off it);
    /// the route is planned 4-connected over the whole grid. The returned
    /// index is `(checkpoint_index + 1) % len`, wrapping the loop
    /// indefinitely. With no checkpoints at all the result is an empty path
    /// and index `0`.
    pub fn next_checkpoint_path(
        &self,
        agent_cell: CellCoord,
        checkpoint_index: usize,
    ) -> (Vec<WorldPoint>, usize) {
        if self.checkpoints.is_empty() {
            return (Vec::new(), 0);
        }
        let index = checkpoint_index % self.checkpoints.len();
        let goal = self.checkpoints[index];

        let start = crate::snap::nearest_walkable(
            &self.grid,
            self.grid.cell_to_world(agent_cell),
            self.window_radius_px,
        )
        .map(|point| self.grid.world_to_cell(point))
        .unwrap_or(agent_cell);

        let path = astar_search_grid(&self.grid, start, goal, Connectivity::FourWay)
            .into_iter()
            .map(|cell| self.grid.cell_to_world(cell))
            .collect();
        (path, (index + 1) % self.checkpoints.len())
    }
}
