//! Physical constants shared by every agent in a flock.
//!
//! The runtime builds a [`FlockConfig`] from the `flock` and `world`
//! sections of `brunzit-config.yaml` and hands a copy to each new flock.

use glam::Vec2;

/// The toroidal screen area agents live in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Wrap a position into `[0, width) x [0, height)`. Leaving through one
    /// edge re-enters through the opposite one.
    pub fn wrap(self, position: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(position.x, self.width), wrap_axis(position.y, self.height))
    }

    /// Whether both dimensions are finite and positive.
    pub const fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// `rem_euclid` of a tiny negative value rounds up to `size` itself.
fn wrap_axis(value: f32, size: f32) -> f32 {
    let wrapped = value.rem_euclid(size);
    if wrapped >= size { 0.0 } else { wrapped }
}

/// Largest group a single `make` may create unless configured otherwise.
pub const DEFAULT_MAX_GROUP_SIZE: u32 = 10_000;

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Configuration for a flock's agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    /// Velocity magnitude cap applied during integration (default: 4.0).
    pub max_speed: f32,

    /// Magnitude cap for one steering correction (default: 0.05).
    pub max_steer_force: f32,

    /// Total voice volume split over a new flock's agents (default: 0.05).
    pub initial_volume: f32,

    /// Upper bound on the agent count of one new flock (default: 10 000).
    pub max_group_size: u32,

    /// Screen bounds used for spawning and wrapping.
    pub viewport: Viewport,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            max_steer_force: 0.05,
            initial_volume: 0.05,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            viewport: Viewport::default(),
        }
    }
}
