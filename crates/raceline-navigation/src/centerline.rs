//! Centerline extraction.
//!
//! Works directly on the source image rather than the grid: each sampled
//! scanline is swept from both ends for its outermost walkable pixels, and
//! the midpoint of that span approximates the track's medial axis at that
//! height. Crude, but cheap, and good enough as a reference line for cars
//! that have lost their path.

use crate::map::classify::WalkabilityRule;
use crate::map::point::WorldPoint;
use image::RgbImage;

/// Spans narrower than this are scanline noise (a wall edge clipping the
/// sweep), not track.
const MIN_SPAN_PX: u32 = 4;

const FALLBACK_POINTS: usize = 36;

/// Extracts a midline by sampling every `step_px`-th scanline.
///
/// For each sampled `y`, the first walkable pixel from the left and from the
/// right bound the track's horizontal extent; when the span is wider than
/// `MIN_SPAN_PX`, its midpoint is emitted. The result is never empty: when no
/// scanline produces a valid span (for example a vertically-striped or fully
/// blocked image), a `FALLBACK_POINTS`-point circle centered on the image
/// with radius `0.7 * min(width, height) / 2` is synthesized so callers
/// always have a reference line to follow.
pub fn extract_centerline(
    image: &RgbImage,
    rule: &WalkabilityRule,
    step_px: u32,
) -> Vec<WorldPoint> {
    let (width, height) = image.dimensions();
    let step = step_px.max(1);

    let mut centerline = Vec::new();
    for y in (0..height).step_by(step as usize) {
        let left = (0..width).find(|&x| rule.is_walkable(image.get_pixel(x, y)));
        let right = (0..width).rev().find(|&x| rule.is_walkable(image.get_pixel(x, y)));
        if let (Some(left), Some(right)) = (left, right) {
            if right - left > MIN_SPAN_PX {
                centerline.push(WorldPoint::new((left + right) as f32 / 2.0, y as f32));
            }
        }
    }

    if centerline.is_empty() {
        centerline = fallback_circle(width, height);
    }
    centerline
}

fn fallback_circle(width: u32, height: u32) -> Vec<WorldPoint> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = 0.7 * width.min(height) as f32 / 2.0;
    (0..FALLBACK_POINTS)
        .map(|i| {
            let angle = i as f32 / FALLBACK_POINTS as f32 * std::f32::consts::TAU;
            WorldPoint::new(cx + angle.cos() * radius, cy + angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn dark_road_rule() -> WalkabilityRule {
        WalkabilityRule::BrightnessBelow { threshold: 150.0 }
    }

    #[test]
    fn test_vertical_strip_yields_its_midline() {
        // dark road occupying columns 20..=39 of a light image
        let mut image = RgbImage::from_pixel(60, 30, Rgb([255, 255, 255]));
        for y in 0..30 {
            for x in 20..40 {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let centerline = extract_centerline(&image, &dark_road_rule(), 6);
        assert_eq!(centerline.len(), 5, "one point per sampled scanline");
        for (i, point) in centerline.iter().enumerate() {
            assert_eq!(point.x, 29.5, "midpoint of span 20..=39");
            assert_eq!(point.y, (i * 6) as f32);
        }
    }

    #[test]
    fn test_narrow_spans_are_skipped() {
        // a 4-pixel-wide sliver is within the noise margin
        let mut image = RgbImage::from_pixel(60, 12, Rgb([255, 255, 255]));
        for y in 0..6 {
            for x in 10..14 {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        // wide road on the lower scanlines only
        for y in 6..12 {
            for x in 10..40 {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let centerline = extract_centerline(&image, &dark_road_rule(), 6);
        assert_eq!(centerline.len(), 1);
        assert_eq!(centerline[0].y, 6.0);
    }

    #[test]
    fn test_fallback_circle_when_no_span_found() {
        let image = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        let centerline = extract_centerline(&image, &dark_road_rule(), 6);
        assert_eq!(centerline.len(), 36, "fallback circle has exactly 36 points");

        let radius = 0.7 * 80.0 / 2.0;
        for point in &centerline {
            let distance = point.distance_to(WorldPoint::new(50.0, 40.0));
            assert!(
                (distance - radius).abs() < 1e-3,
                "fallback point {:?} is not on the circle",
                point
            );
        }
    }
}
