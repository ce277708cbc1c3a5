//! Kinematic state and motion primitives for a single agent.
//!
//! An agent owns position, velocity, an acceleration accumulator and a
//! cached heading. Steering passes only ever add to the accumulator; the
//! accumulator is folded into velocity by [`Agent::integrate`], which runs
//! as part of `go`.
//!
//! Death is terminal. A dead agent stays in its flock's collection but is
//! skipped by every later operation.

use brunzit_types::{AgentId, AgentSnapshot};
use glam::Vec2;
use rand::Rng;

use crate::config::Viewport;

/// Largest heading jitter applied by `wander`, in degrees either way.
pub const WANDER_MAX_DEGREES: f32 = 90.0;

/// One of the four screen directions. Screen `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinal {
    /// `-y`
    Up,
    /// `+y`
    Down,
    /// `-x`
    Left,
    /// `+x`
    Right,
}

impl Cardinal {
    /// Unit vector pointing this way in screen coordinates.
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::NEG_Y,
            Self::Down => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// Per-agent voice state read by the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Amplitude.
    pub volume: f32,
    /// Set when the agent dies; the voice must stay quiet from then on.
    pub silenced: bool,
}

/// A single autonomous entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    /// Normalised velocity, zero when stationary.
    direction: Vec2,
    heading: f32,
    alive: bool,
    voice: Voice,
}

impl Agent {
    /// Create a living agent with no pending acceleration.
    pub fn new(position: Vec2, velocity: Vec2, volume: f32) -> Self {
        let mut agent = Self {
            id: AgentId::new(),
            position,
            velocity,
            acceleration: Vec2::ZERO,
            direction: Vec2::ZERO,
            heading: 0.0,
            alive: true,
            voice: Voice {
                volume,
                silenced: false,
            },
        };
        agent.compute_heading();
        agent
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Stable identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Pending acceleration, cleared by the next integration.
    pub const fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Unit direction of travel, or zero when stationary.
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Heading in radians.
    pub const fn heading(&self) -> f32 {
        self.heading
    }

    /// Whether the agent is still alive.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// The agent's voice.
    pub const fn voice(&self) -> Voice {
        self.voice
    }

    /// Read-only view for collaborators.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            heading: self.heading,
            volume: self.voice.volume,
            alive: self.alive,
        }
    }

    // -----------------------------------------------------------------------
    // Integration
    // -----------------------------------------------------------------------

    /// Add a steering force to the acceleration accumulator.
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Fold acceleration into velocity, cap speed, advance position, and
    /// clear the accumulator.
    pub fn integrate(&mut self, max_speed: f32) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.compute_heading();
    }

    /// Integrate once, then move a further `velocity * mult` and wrap.
    pub fn go(&mut self, mult: f32, max_speed: f32, viewport: Viewport) {
        self.integrate(max_speed);
        self.position += self.velocity * mult;
        self.wrap(viewport);
    }

    /// Toroidal wrap into the viewport.
    pub fn wrap(&mut self, viewport: Viewport) {
        self.position = viewport.wrap(self.position);
    }

    // -----------------------------------------------------------------------
    // Motion primitives
    // -----------------------------------------------------------------------

    /// Rotate velocity by `degrees`.
    pub fn turn(&mut self, degrees: f32) {
        self.velocity = Vec2::from_angle(degrees.to_radians()).rotate(self.velocity);
        self.compute_heading();
    }

    /// Replace velocity with a unit vector in a screen direction.
    pub fn face(&mut self, cardinal: Cardinal) {
        self.velocity = cardinal.unit();
        self.compute_heading();
    }

    /// Halt: zero velocity and drop pending acceleration.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.compute_heading();
    }

    /// Point velocity at `target` with unit speed. Does nothing when the
    /// agent already sits on the target.
    pub fn seek(&mut self, target: Vec2) {
        let Some(direction) = (target - self.position).try_normalize() else {
            return;
        };
        self.velocity = direction;
        self.compute_heading();
    }

    /// With probability `probability`, rotate heading by a uniform angle in
    /// `[-90, 90]` degrees. Returns whether a jitter happened.
    pub fn wander<R: Rng + ?Sized>(&mut self, probability: f32, rng: &mut R) -> bool {
        if rng.random::<f32>() >= probability {
            return false;
        }
        let degrees = rng.random_range(-WANDER_MAX_DEGREES..=WANDER_MAX_DEGREES);
        self.turn(degrees);
        true
    }

    /// Mark the agent dead and silence its voice. Returns `false` if it was
    /// already dead.
    pub const fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.voice.silenced = true;
        true
    }

    /// Set the voice amplitude. Silenced voices ignore this.
    pub const fn set_volume(&mut self, volume: f32) {
        if !self.voice.silenced {
            self.voice.volume = volume;
        }
    }

    fn compute_heading(&mut self) {
        if self.velocity == Vec2::ZERO {
            self.direction = Vec2::ZERO;
            self.heading = 0.0;
        } else {
            self.direction = self.velocity.normalize_or_zero();
            self.heading = self.velocity.y.atan2(self.velocity.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn heading_tracks_velocity() {
        let agent = Agent::new(Vec2::ZERO, Vec2::new(0.0, 2.0), 0.0);
        assert!((agent.heading() - FRAC_PI_2).abs() < 1e-6);
        assert!(close(agent.direction(), Vec2::Y));
    }

    #[test]
    fn stationary_agent_has_zero_heading() {
        let agent = Agent::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        assert!(agent.heading().abs() < f32::EPSILON);
        assert_eq!(agent.direction(), Vec2::ZERO);
    }

    #[test]
    fn integrate_caps_speed_and_clears_acceleration() {
        let mut agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::new(3.0, 0.0), 0.0);
        agent.apply_force(Vec2::new(5.0, 0.0));
        agent.integrate(4.0);
        assert!(close(agent.velocity(), Vec2::new(4.0, 0.0)));
        assert!(close(agent.position(), Vec2::new(14.0, 10.0)));
        assert_eq!(agent.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn go_displaces_by_multiplier_and_wraps() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut agent = Agent::new(Vec2::new(95.0, 50.0), Vec2::new(2.0, 0.0), 0.0);
        agent.go(2.0, 4.0, viewport);
        // 95 + 2 (integration) + 4 (2 * velocity) = 101 -> 1
        assert!(close(agent.position(), Vec2::new(1.0, 50.0)));
    }

    #[test]
    fn turn_rotates_velocity() {
        let mut agent = Agent::new(Vec2::ZERO, Vec2::X, 0.0);
        agent.turn(90.0);
        assert!(close(agent.velocity(), Vec2::Y));
        agent.turn(-180.0);
        assert!(close(agent.velocity(), Vec2::NEG_Y));
    }

    #[test]
    fn turning_a_stationary_agent_keeps_zero_heading() {
        let mut agent = Agent::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        agent.turn(45.0);
        assert_eq!(agent.velocity(), Vec2::ZERO);
        assert!(agent.heading().abs() < f32::EPSILON);
    }

    #[test]
    fn cardinal_directions_use_screen_axes() {
        let mut agent = Agent::new(Vec2::ZERO, Vec2::new(3.0, 3.0), 0.0);
        agent.face(Cardinal::Up);
        assert_eq!(agent.velocity(), Vec2::new(0.0, -1.0));
        agent.face(Cardinal::Left);
        assert_eq!(agent.velocity(), Vec2::new(-1.0, 0.0));
        agent.face(Cardinal::Down);
        assert_eq!(agent.velocity(), Vec2::new(0.0, 1.0));
        agent.face(Cardinal::Right);
        assert_eq!(agent.velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn stop_zeroes_motion() {
        let mut agent = Agent::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.0);
        agent.apply_force(Vec2::X);
        agent.stop();
        assert_eq!(agent.velocity(), Vec2::ZERO);
        assert_eq!(agent.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn seek_points_at_target() {
        let mut agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 0.0);
        agent.seek(Vec2::new(10.0, 20.0));
        assert!(close(agent.velocity(), Vec2::Y));
    }

    #[test]
    fn seek_onto_own_position_is_a_no_op() {
        let mut agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::X, 0.0);
        agent.seek(Vec2::new(10.0, 10.0));
        assert_eq!(agent.velocity(), Vec2::X);
    }

    #[test]
    fn wander_keeps_speed_and_bounds_angle() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut agent = Agent::new(Vec2::ZERO, Vec2::X, 0.0);
            if agent.wander(1.0, &mut rng) {
                assert!((agent.velocity().length() - 1.0).abs() < 1e-4);
                assert!(agent.heading().abs() <= FRAC_PI_2 + 1e-4);
            }
        }
    }

    #[test]
    fn wander_with_zero_probability_never_turns() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = Agent::new(Vec2::ZERO, Vec2::X, 0.0);
        for _ in 0..100 {
            assert!(!agent.wander(0.0, &mut rng));
        }
        assert_eq!(agent.velocity(), Vec2::X);
    }

    #[test]
    fn death_is_terminal_and_silences() {
        let mut agent = Agent::new(Vec2::ZERO, Vec2::X, 0.2);
        assert!(agent.die());
        assert!(!agent.die());
        assert!(!agent.is_alive());
        assert!(agent.voice().silenced);
        agent.set_volume(0.9);
        assert!((agent.voice().volume - 0.2).abs() < f32::EPSILON);
    }
}
