//! Neighbour-based steering: separation (`avoid`), cohesion (`join`) and
//! alignment (`align`).
//!
//! Forces are computed against a [`Body`] snapshot taken before any agent
//! in the pass is touched, so the result of a pass never depends on the
//! order agents are visited. Every force returned here has magnitude at
//! most [`SteeringLimits::max_force`]; the caller scales it by the
//! action's strength.

use glam::Vec2;

use crate::agent::Agent;

/// Position and velocity of one agent at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Position at snapshot time.
    pub position: Vec2,
    /// Velocity at snapshot time.
    pub velocity: Vec2,
}

impl Body {
    /// Capture an agent's current kinematic state.
    pub const fn of(agent: &Agent) -> Self {
        Self {
            position: agent.position(),
            velocity: agent.velocity(),
        }
    }
}

/// Speed and force caps of the flock running a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringLimits {
    /// Desired speed when steering toward something.
    pub max_speed: f32,
    /// Cap on the returned steering force.
    pub max_force: f32,
}

/// Which neighbour rule a pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringRule {
    /// Steer away from neighbours, weighted by inverse distance.
    Separation,
    /// Steer toward the neighbours' centroid.
    Cohesion,
    /// Steer toward the neighbours' mean velocity direction.
    Alignment,
}

impl SteeringRule {
    /// Compute the steering force for `me` against every body in `bodies`.
    ///
    /// Neighbours are bodies at Euclidean distance in `(0, threshold)`, so
    /// `me` itself (and anything exactly on top of it) never counts.
    /// Returns [`Vec2::ZERO`] when there is nothing to steer by.
    pub fn force(self, me: Body, bodies: &[Body], threshold: f32, limits: SteeringLimits) -> Vec2 {
        match self {
            Self::Separation => separation(me, bodies, threshold, limits),
            Self::Cohesion => cohesion(me, bodies, threshold, limits),
            Self::Alignment => alignment(me, bodies, threshold, limits),
        }
    }
}

fn neighbours(me: Body, bodies: &[Body], threshold: f32) -> impl Iterator<Item = (Body, f32)> + '_ {
    bodies.iter().filter_map(move |other| {
        let distance = me.position.distance(other.position);
        (distance > 0.0 && distance < threshold).then_some((*other, distance))
    })
}

fn separation(me: Body, bodies: &[Body], threshold: f32, limits: SteeringLimits) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;
    for (other, distance) in neighbours(me, bodies, threshold) {
        sum += (me.position - other.position).normalize_or_zero() / distance;
        count = count.saturating_add(1);
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let mean = sum / count as f32;
    let Some(direction) = mean.try_normalize() else {
        return Vec2::ZERO;
    };
    (direction * limits.max_speed - me.velocity).clamp_length_max(limits.max_force)
}

fn cohesion(me: Body, bodies: &[Body], threshold: f32, limits: SteeringLimits) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;
    for (other, _) in neighbours(me, bodies, threshold) {
        sum += other.position;
        count = count.saturating_add(1);
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    seek_force(sum / count as f32, me, limits)
}

fn alignment(me: Body, bodies: &[Body], threshold: f32, limits: SteeringLimits) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0_u32;
    for (other, _) in neighbours(me, bodies, threshold) {
        sum += other.velocity;
        count = count.saturating_add(1);
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    let Some(heading) = (sum / count as f32).try_normalize() else {
        return Vec2::ZERO;
    };
    (heading - me.velocity).clamp_length_max(limits.max_force)
}

/// Reynolds seek: desired velocity toward `target` at max speed, minus the
/// current velocity, clamped to the force cap.
pub fn seek_force(target: Vec2, me: Body, limits: SteeringLimits) -> Vec2 {
    let Some(direction) = (target - me.position).try_normalize() else {
        return Vec2::ZERO;
    };
    (direction * limits.max_speed - me.velocity).clamp_length_max(limits.max_force)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const LIMITS: SteeringLimits = SteeringLimits {
        max_speed: 4.0,
        max_force: 0.05,
    };

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn lone_body_feels_nothing() {
        let me = body(0.0, 0.0, 1.0, 0.0);
        for rule in [SteeringRule::Separation, SteeringRule::Cohesion, SteeringRule::Alignment] {
            assert_eq!(rule.force(me, &[me], 50.0, LIMITS), Vec2::ZERO);
        }
    }

    #[test]
    fn separation_pushes_away() {
        let me = body(0.0, 0.0, 0.0, 0.0);
        let other = body(5.0, 0.0, 0.0, 0.0);
        let force = SteeringRule::Separation.force(me, &[me, other], 10.0, LIMITS);
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 1e-6);
    }

    #[test]
    fn cohesion_pulls_toward_centroid() {
        let me = body(0.0, 0.0, 0.0, 0.0);
        let bodies = [me, body(0.0, 4.0, 0.0, 0.0), body(0.0, 6.0, 0.0, 0.0)];
        let force = SteeringRule::Cohesion.force(me, &bodies, 10.0, LIMITS);
        assert!(force.y > 0.0);
        assert!(force.x.abs() < 1e-6);
    }

    #[test]
    fn alignment_turns_toward_mean_velocity() {
        let me = body(0.0, 0.0, 0.0, 0.0);
        let bodies = [me, body(1.0, 0.0, 0.0, 2.0), body(-1.0, 0.0, 0.0, 4.0)];
        let force = SteeringRule::Alignment.force(me, &bodies, 10.0, LIMITS);
        assert!(force.y > 0.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let me = body(0.0, 0.0, 0.0, 0.0);
        let other = body(10.0, 0.0, 0.0, 0.0);
        assert_eq!(SteeringRule::Cohesion.force(me, &[me, other], 10.0, LIMITS), Vec2::ZERO);
    }

    #[test]
    fn coincident_bodies_are_not_neighbours() {
        let me = body(3.0, 3.0, 0.0, 0.0);
        let twin = body(3.0, 3.0, 1.0, 0.0);
        assert_eq!(SteeringRule::Separation.force(me, &[me, twin], 10.0, LIMITS), Vec2::ZERO);
    }

    #[test]
    fn forces_never_exceed_cap() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let bodies: Vec<Body> = (0..30)
                .map(|_| {
                    body(
                        rng.random_range(0.0..200.0),
                        rng.random_range(0.0..200.0),
                        rng.random_range(-4.0..4.0),
                        rng.random_range(-4.0..4.0),
                    )
                })
                .collect();
            for &me in &bodies {
                for rule in [SteeringRule::Separation, SteeringRule::Cohesion, SteeringRule::Alignment] {
                    let force = rule.force(me, &bodies, 80.0, LIMITS);
                    assert!(force.length() <= LIMITS.max_force + 1e-6);
                }
            }
        }
    }

    #[test]
    fn seek_force_is_zero_on_target() {
        let me = body(5.0, 5.0, 1.0, 0.0);
        assert_eq!(seek_force(Vec2::new(5.0, 5.0), me, LIMITS), Vec2::ZERO);
    }
}
