//! AI car entity and its movement task.
//!
//! A car owns its whole mutable state — position, heading, speed, current
//! path and indices — and advances it itself; the engine only hands out
//! immutable paths on request. Each car runs as a single-owner tokio task, so
//! no locking is needed anywhere: the shared [`TrackContext`] is read-only.

use raceline_navigation::{TrackContext, WorldPoint};
use std::f32::consts::PI;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Waypoints closer than this count as reached.
const ARRIVE_RADIUS_PX: f32 = 6.0;
/// Steering limit per tick (rad).
const MAX_TURN_RAD: f32 = 0.06;
/// Speed floor while cornering, as a fraction of top speed.
const MIN_SPEED_FACTOR: f32 = 0.45;
/// A waypoint this far away means the car has left its route; replan locally
/// instead of chasing it across the map.
const REPLAN_DISTANCE_PX: f32 = 80.0;

/// One AI car following the checkpoint loop.
#[derive(Debug, Clone)]
pub struct Car {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
    max_speed: f32,
    path: Vec<WorldPoint>,
    path_index: usize,
    checkpoint_index: usize,
    /// Checkpoint routes completed so far.
    pub checkpoints_reached: usize,
}

impl Car {
    pub fn new(start: WorldPoint, max_speed: f32) -> Self {
        Car {
            x: start.x,
            y: start.y,
            heading: 0.0,
            speed: 0.0,
            max_speed,
            path: Vec::new(),
            path_index: 0,
            checkpoint_index: 0,
            checkpoints_reached: 0,
        }
    }

    fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// One movement tick.
    ///
    /// Steers toward the current waypoint with a clamped turn rate, slowing
    /// through corners; advances to the next waypoint inside the arrival
    /// radius; asks the context for the route to the next checkpoint when the
    /// current path is exhausted. An empty route (no path this tick) leaves
    /// the car in place — it simply retries on the next tick.
    pub fn update(&mut self, context: &TrackContext) {
        if self.path_index >= self.path.len() {
            if !self.path.is_empty() {
                self.checkpoints_reached += 1;
            }
            let cell = context.grid().world_to_cell(self.position());
            let (path, next_index) = context.next_checkpoint_path(cell, self.checkpoint_index);
            debug!(
                waypoints = path.len(),
                checkpoint = self.checkpoint_index,
                "requested checkpoint route"
            );
            self.path = path;
            self.path_index = 0;
            self.checkpoint_index = next_index;
            if self.path.is_empty() {
                return;
            }
        }

        let target = self.path[self.path_index];
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = dx.hypot(dy);
        if distance < ARRIVE_RADIUS_PX {
            self.path_index += 1;
            return;
        }

        // off-route recovery: a bounded replan from wherever the car ended up
        if distance > REPLAN_DISTANCE_PX {
            let replan =
                context.compute_path(self.position(), target, context.window_radius_px());
            if !replan.is_empty() {
                self.path = replan;
                self.path_index = 0;
                return;
            }
        }

        let error = normalize_angle(dy.atan2(dx) - self.heading);
        self.heading = normalize_angle(self.heading + error.clamp(-MAX_TURN_RAD, MAX_TURN_RAD));

        let corner_factor = (1.0 - (error.abs() / PI).min(0.8)).max(MIN_SPEED_FACTOR);
        self.speed = self.max_speed * corner_factor;
        self.x += self.heading.cos() * self.speed;
        self.y += self.heading.sin() * self.speed;
    }
}

/// Normalize an angle to `[-PI, PI)`.
fn normalize_angle(angle: f32) -> f32 {
    let a = angle % (2.0 * PI);
    if a >= PI {
        a - 2.0 * PI
    } else if a < -PI {
        a + 2.0 * PI
    } else {
        a
    }
}

/// Drives one car for a fixed number of ticks and returns its final state.
///
/// The task owns the car outright; the context is shared read-only.
pub async fn run_follow_task(
    id: usize,
    context: Arc<TrackContext>,
    mut car: Car,
    ticks: u64,
    period: Duration,
) -> Car {
    info!(car = id, x = car.x, y = car.y, "car task started");
    let mut interval = tokio::time::interval(period);
    for _ in 0..ticks {
        interval.tick().await;
        car.update(&context);
    }
    car
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use raceline_navigation::TrackConfig;

    fn open_context() -> TrackContext {
        let image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let config = TrackConfig {
            checkpoint_step: 50,
            ..TrackConfig::default()
        };
        TrackContext::new(&image, config).unwrap()
    }

    #[test]
    fn test_drives_straight_to_an_aligned_waypoint() {
        let context = open_context();
        let mut car = Car::new(WorldPoint::new(20.0, 50.0), 2.6);
        // heading starts at 0 (+x), so this waypoint is dead ahead
        car.path = vec![WorldPoint::new(80.0, 50.0)];

        let mut arrived = false;
        for _ in 0..60 {
            car.update(&context);
            if car.path_index == 1 {
                arrived = true;
                break;
            }
        }
        assert!(arrived, "car failed to reach a waypoint straight ahead");
        assert!((car.y - 50.0).abs() < 1e-3, "car drifted off the straight line");
        assert!((car.x - 80.0).abs() < ARRIVE_RADIUS_PX + 2.6);
    }

    #[test]
    fn test_requests_route_and_moves() {
        let context = open_context();
        let mut car = Car::new(context.spawn(), 2.6);

        let start = (car.x, car.y);
        for _ in 0..200 {
            car.update(&context);
        }
        assert!((car.x, car.y) != start, "car never moved on an open track");
        assert!(car.checkpoint_index >= 1, "no route was ever requested");
    }

    #[test]
    fn test_stays_put_without_any_route() {
        // nothing walkable: every route request comes back empty
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let context = TrackContext::new(&image, TrackConfig::default()).unwrap();
        let mut car = Car::new(WorldPoint::new(50.0, 50.0), 2.6);

        for _ in 0..50 {
            car.update(&context);
        }
        assert_eq!((car.x, car.y), (50.0, 50.0));
        assert_eq!(car.checkpoints_reached, 0);
    }

    #[test]
    fn test_normalize_angle_range() {
        for angle in [-7.0f32, -PI, 0.0, 1.0, PI, 6.5, 20.0] {
            let normalized = normalize_angle(angle);
            assert!(
                (-PI..PI).contains(&normalized),
                "{} normalized to {}",
                angle,
                normalized
            );
        }
    }
}
