//! This module defines the error types used by the `raceline-navigation` crate.

#![warn(missing_docs)]

/// Error type for track engine construction.
///
/// Every variant is a startup-time failure: a navigation context built from
/// these parameters could never answer a query, so initialization must abort.
/// Per-query failures (no path, no walkable cell in range) are never errors;
/// they are reported as empty paths or `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// Error for an invalid grid cell size.
    /// This variant is returned when the configured cell size is zero.
    InvalidCellSize(&'static str),
    /// Error for an unusable source image.
    /// This variant is returned when the track image has zero width or height.
    EmptyImage(&'static str),
    /// Error for an invalid checkpoint sampling interval.
    /// This variant is returned when the checkpoint step count is zero.
    InvalidCheckpointStep(&'static str),
    /// Error for an invalid centerline scan step.
    /// This variant is returned when the vertical scan step is zero.
    InvalidScanStep(&'static str),
}

impl core::fmt::Display for NavError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavError::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
            NavError::EmptyImage(msg) => write!(f, "Unusable track image: {}", msg),
            NavError::InvalidCheckpointStep(msg) => {
                write!(f, "Invalid checkpoint step: {}", msg)
            }
            NavError::InvalidScanStep(msg) => write!(f, "Invalid centerline scan step: {}", msg),
        }
    }
}

impl std::error::Error for NavError {}
