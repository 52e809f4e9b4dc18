//! Track map types: pixel classification, the walkability grid, and the
//! coordinate types shared by every query.

pub mod classify;
pub mod grid;
pub mod point;

pub use classify::WalkabilityRule;
pub use grid::TrackGrid;
pub use point::{CellCoord, WorldPoint};
