//! Track navigation engine.
//!
//! Converts a raster track image into a walkability grid and answers
//! pathfinding queries over it for racing-game AI:
//!
//! * [`map`] — pixel classification, the rasterized grid, and the coordinate
//!   conversions between image pixels and grid cells.
//! * [`snap`] — nearest-walkable snapping for off-track query points.
//! * [`astar`] — the A* core, windowed (8-connected local replans) and
//!   whole-grid (4-connected long-range routes).
//! * [`centerline`] — per-scanline midline extraction with a synthesized
//!   fallback.
//! * [`checkpoints`] — the BFS-sampled, closed checkpoint loop.
//! * [`context`] — [`TrackContext`], the immutable built-once bundle exposing
//!   the query API.
//!
//! The context is constructed once at startup (the only fallible step) and is
//! safe to share across concurrent readers; per-query failure is an empty
//! path or `None`, never an error.

pub mod astar;
pub mod centerline;
pub mod checkpoints;
pub mod context;
pub mod error;
pub mod map;
pub mod snap;

pub use context::{TrackConfig, TrackContext};
pub use error::NavError;
pub use map::classify::WalkabilityRule;
pub use map::grid::TrackGrid;
pub use map::point::{CellCoord, WorldPoint};
