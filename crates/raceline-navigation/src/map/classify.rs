//! Walkability classification of source-image pixels.
//!
//! A rule is a pure predicate over a single RGB pixel. The rule is engine
//! configuration: different track art encodes the road differently (dark road
//! on light ground, light road on dark ground, or a reserved wall color), so
//! the classifier is swappable rather than a fixed brightness test.

use image::Rgb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides whether a sampled pixel belongs to the traversable track surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WalkabilityRule {
    /// Walkable when the pixel's mean channel brightness is below the threshold
    /// (dark road on a light background).
    BrightnessBelow {
        /// Brightness cutoff in `[0, 255]`.
        threshold: f32,
    },
    /// Walkable when the pixel's mean channel brightness is above the threshold
    /// (light road on a dark background).
    BrightnessAbove {
        /// Brightness cutoff in `[0, 255]`.
        threshold: f32,
    },
    /// Walkable when the pixel differs from a reserved obstacle color.
    NotColor {
        /// The RGB triple that marks non-walkable pixels.
        color: [u8; 3],
    },
}

impl WalkabilityRule {
    /// Applies the rule to a pixel.
    ///
    /// Deterministic and side-effect free; the same pixel always yields the
    /// same verdict.
    #[must_use]
    pub fn is_walkable(&self, pixel: &Rgb<u8>) -> bool {
        match self {
            WalkabilityRule::BrightnessBelow { threshold } => brightness(pixel) < *threshold,
            WalkabilityRule::BrightnessAbove { threshold } => brightness(pixel) > *threshold,
            WalkabilityRule::NotColor { color } => pixel.0 != *color,
        }
    }
}

/// Mean of the three channels, in `[0, 255]`.
fn brightness(pixel: &Rgb<u8>) -> f32 {
    let [r, g, b] = pixel.0;
    (r as f32 + g as f32 + b as f32) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_below() {
        let rule = WalkabilityRule::BrightnessBelow { threshold: 150.0 };
        assert!(rule.is_walkable(&Rgb([40, 40, 40])), "dark pixel is road");
        assert!(!rule.is_walkable(&Rgb([230, 230, 230])), "light pixel is not road");
        // mean of (150, 150, 150) is exactly the threshold; strict comparison
        assert!(!rule.is_walkable(&Rgb([150, 150, 150])));
    }

    #[test]
    fn test_brightness_above() {
        let rule = WalkabilityRule::BrightnessAbove { threshold: 150.0 };
        assert!(rule.is_walkable(&Rgb([230, 230, 230])), "light pixel is road");
        assert!(!rule.is_walkable(&Rgb([40, 40, 40])), "dark pixel is not road");
    }

    #[test]
    fn test_not_color() {
        let rule = WalkabilityRule::NotColor { color: [255, 0, 0] };
        assert!(!rule.is_walkable(&Rgb([255, 0, 0])), "wall color is not road");
        assert!(rule.is_walkable(&Rgb([254, 0, 0])), "any other color is road");
    }

    #[test]
    fn test_brightness_uses_channel_mean() {
        // (255 + 0 + 0) / 3 = 85
        let rule = WalkabilityRule::BrightnessBelow { threshold: 86.0 };
        assert!(rule.is_walkable(&Rgb([255, 0, 0])));
        let rule = WalkabilityRule::BrightnessBelow { threshold: 85.0 };
        assert!(!rule.is_walkable(&Rgb([255, 0, 0])));
    }
}
