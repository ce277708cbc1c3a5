//! A named group of agents and the per-action operations run on it.
//!
//! [`Flock::apply`] is the single dispatch point for a [`FlockAction`]. It
//! matches exhaustively over [`Steer`], so adding a verb without teaching
//! the flock how to run it is a compile error.
//!
//! Frequency gating happens here:
//!
//! - Per-agent actions draw one sample per living agent.
//! - `avoid`, `join` and `align` draw one sample for the whole pass.

use brunzit_types::{AgentId, FlockAction, FlockId, FlockSnapshot, Frequency, Neighbourhood, Rgb, Steer};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::agent::{Agent, Cardinal};
use crate::config::FlockConfig;
use crate::error::FlockError;
use crate::steering::{Body, SteeringLimits, SteeringRule};

/// What one dispatch did to the flock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Agents the action touched (passed the gate, or received a non-zero
    /// steering force).
    pub agents_affected: u32,
    /// Agents that died during this dispatch.
    pub deaths: Vec<AgentId>,
}

impl Dispatch {
    const fn touched(agents_affected: u32) -> Self {
        Self {
            agents_affected,
            deaths: Vec::new(),
        }
    }
}

/// A group of agents sharing one identity and one set of physical constants.
#[derive(Debug, Clone)]
pub struct Flock {
    id: FlockId,
    name: String,
    glyph: String,
    color: Rgb,
    agents: Vec<Agent>,
    config: FlockConfig,
}

impl Flock {
    /// Spawn `count` agents at uniformly random positions inside the
    /// viewport, with velocities drawn from `[0, 1)` on each axis. The
    /// configured initial volume is split evenly across the voices.
    pub fn spawn<R: Rng + ?Sized>(
        name: String,
        count: u32,
        glyph: String,
        color: Rgb,
        config: FlockConfig,
        rng: &mut R,
    ) -> Result<Self, FlockError> {
        validate(&config)?;
        if count > config.max_group_size {
            return Err(FlockError::GroupTooLarge {
                count,
                max: config.max_group_size,
            });
        }

        let volume = if count == 0 {
            0.0
        } else {
            config.initial_volume / count as f32
        };
        let viewport = config.viewport;
        let agents = (0..count)
            .map(|_| {
                let position = Vec2::new(
                    rng.random::<f32>() * viewport.width,
                    rng.random::<f32>() * viewport.height,
                );
                let velocity = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
                Agent::new(position, velocity, volume)
            })
            .collect();

        let flock = Self {
            id: FlockId::new(),
            name,
            glyph,
            color,
            agents,
            config,
        };
        debug!(flock = %flock.id, name = flock.name, count, "flock spawned");
        Ok(flock)
    }

    /// Build a flock from pre-made agents (placement under caller control).
    pub fn from_agents(
        name: String,
        glyph: String,
        color: Rgb,
        agents: Vec<Agent>,
        config: FlockConfig,
    ) -> Result<Self, FlockError> {
        validate(&config)?;
        Ok(Self {
            id: FlockId::new(),
            name,
            glyph,
            color,
            agents,
            config,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Stable identifier.
    pub const fn id(&self) -> FlockId {
        self.id
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Glyph drawn for each agent.
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Glyph colour.
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Every agent, dead ones included.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Physical constants.
    pub const fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Number of living agents.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Read-only view for collaborators.
    pub fn snapshot(&self) -> FlockSnapshot {
        FlockSnapshot {
            id: self.id,
            name: self.name.clone(),
            glyph: self.glyph.clone(),
            color: self.color,
            agents: self.agents.iter().map(Agent::snapshot).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Run one action against the flock under its frequency gate.
    pub fn apply<R: Rng + ?Sized>(&mut self, action: &FlockAction, rng: &mut R) -> Dispatch {
        let frequency = action.frequency;
        let max_speed = self.config.max_speed;
        let viewport = self.config.viewport;

        let dispatch = match &action.steer {
            Steer::Go { mult } => {
                let mult = *mult;
                Dispatch::touched(self.each_gated(frequency, rng, |agent, _| {
                    agent.go(mult, max_speed, viewport);
                }))
            }
            Steer::Up => self.face(Cardinal::Up, frequency, rng),
            Steer::Down => self.face(Cardinal::Down, frequency, rng),
            Steer::Left => self.face(Cardinal::Left, frequency, rng),
            Steer::Right => self.face(Cardinal::Right, frequency, rng),
            Steer::Turn { degrees } => {
                let degrees = *degrees;
                Dispatch::touched(self.each_gated(frequency, rng, |agent, _| agent.turn(degrees)))
            }
            Steer::Stop => Dispatch::touched(self.each_gated(frequency, rng, |agent, _| agent.stop())),
            Steer::Die { probability } => self.die(*probability, frequency, rng),
            Steer::Volume { level } => self.volume(*level, frequency, rng),
            Steer::Seek { x, y } => {
                let target = Vec2::new(*x, *y);
                Dispatch::touched(self.each_gated(frequency, rng, |agent, _| agent.seek(target)))
            }
            Steer::Wander { probability } => {
                let probability = *probability;
                Dispatch::touched(self.each_gated(frequency, rng, |agent, rng| {
                    agent.wander(probability, rng);
                }))
            }
            Steer::Avoid(hood) => self.steer_pass(SteeringRule::Separation, hood, frequency, rng),
            Steer::Join(hood) => self.steer_pass(SteeringRule::Cohesion, hood, frequency, rng),
            Steer::Align(hood) => self.steer_pass(SteeringRule::Alignment, hood, frequency, rng),
        };

        trace!(
            flock = %self.id,
            verb = action.steer.verb(),
            %frequency,
            affected = dispatch.agents_affected,
            "action dispatched"
        );
        dispatch
    }

    /// Run `op` on every living agent whose gate draw passes. Returns the
    /// number of agents `op` ran on.
    fn each_gated<R, F>(&mut self, frequency: Frequency, rng: &mut R, mut op: F) -> u32
    where
        R: Rng + ?Sized,
        F: FnMut(&mut Agent, &mut R),
    {
        let mut affected = 0_u32;
        for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
            if frequency.admits(rng.random::<f32>()) {
                op(agent, rng);
                affected = affected.saturating_add(1);
            }
        }
        affected
    }

    fn face<R: Rng + ?Sized>(&mut self, cardinal: Cardinal, frequency: Frequency, rng: &mut R) -> Dispatch {
        Dispatch::touched(self.each_gated(frequency, rng, |agent, _| agent.face(cardinal)))
    }

    fn die<R: Rng + ?Sized>(&mut self, probability: f32, frequency: Frequency, rng: &mut R) -> Dispatch {
        let mut deaths = Vec::new();
        let affected = self.each_gated(frequency, rng, |agent, rng| {
            if rng.random::<f32>() < probability && agent.die() {
                deaths.push(agent.id());
            }
        });
        if !deaths.is_empty() {
            debug!(flock = %self.id, deaths = deaths.len(), "agents died");
        }
        Dispatch {
            agents_affected: affected,
            deaths,
        }
    }

    fn volume<R: Rng + ?Sized>(&mut self, level: f32, frequency: Frequency, rng: &mut R) -> Dispatch {
        if self.agents.is_empty() {
            return Dispatch::default();
        }
        let share = level / self.agents.len() as f32;
        Dispatch::touched(self.each_gated(frequency, rng, |agent, _| agent.set_volume(share)))
    }

    /// One neighbour-steering pass. Reads a snapshot of every living agent
    /// first, then accumulates the scaled forces.
    fn steer_pass<R: Rng + ?Sized>(
        &mut self,
        rule: SteeringRule,
        hood: &Neighbourhood,
        frequency: Frequency,
        rng: &mut R,
    ) -> Dispatch {
        if !frequency.admits(rng.random::<f32>()) {
            return Dispatch::default();
        }
        if let Some(target) = hood.target.as_deref() {
            trace!(flock = %self.id, target, "cross-group target ignored, steering within own flock");
        }

        let limits = SteeringLimits {
            max_speed: self.config.max_speed,
            max_force: self.config.max_steer_force,
        };
        let bodies: Vec<Body> = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(Body::of)
            .collect();

        let mut affected = 0_u32;
        let living = self.agents.iter_mut().filter(|a| a.is_alive());
        for (agent, &me) in living.zip(&bodies) {
            let force = rule.force(me, &bodies, hood.threshold, limits);
            if force != Vec2::ZERO {
                agent.apply_force(force * hood.strength);
                affected = affected.saturating_add(1);
            }
        }
        Dispatch::touched(affected)
    }
}

fn validate(config: &FlockConfig) -> Result<(), FlockError> {
    if !config.viewport.is_valid() {
        return Err(FlockError::InvalidViewport {
            width: config.viewport.width,
            height: config.viewport.height,
        });
    }
    for (name, value) in [
        ("max_speed", config.max_speed),
        ("max_steer_force", config.max_steer_force),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(FlockError::InvalidConstant { name, value });
        }
    }
    if !config.initial_volume.is_finite() || config.initial_volume < 0.0 {
        return Err(FlockError::InvalidConstant {
            name: "initial_volume",
            value: config.initial_volume,
        });
    }
    Ok(())
}
