//! Colours and the read-only snapshot handed to render and audio code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::MapKind;
use crate::ids::{AgentId, FlockId};

/// A linear RGB colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::from_u8(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::from_u8(255, 255, 255);

    /// Build a colour from 8-bit channels.
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// The map resource currently loaded into the sound corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResource {
    /// Image or audio.
    pub kind: MapKind,
    /// Asset path as submitted.
    pub file: String,
}

/// Per-agent state visible to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Stable agent identifier.
    pub id: AgentId,
    /// Screen position.
    pub position: Vec2,
    /// Velocity in pixels per step.
    pub velocity: Vec2,
    /// Heading in radians (`atan2(vy, vx)`, 0 when stationary).
    pub heading: f32,
    /// Voice amplitude.
    pub volume: f32,
    /// False once the agent has died.
    pub alive: bool,
}

/// Per-flock state visible to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockSnapshot {
    /// Stable flock identifier.
    pub id: FlockId,
    /// Group name (not necessarily unique).
    pub name: String,
    /// Glyph drawn for every agent.
    pub glyph: String,
    /// Colour used for the glyph.
    pub color: Rgb,
    /// All agents, dead ones included.
    pub agents: Vec<AgentSnapshot>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Number of ticks executed so far.
    pub tick: u64,
    /// Background colour.
    pub background: Rgb,
    /// Loaded map resource, if any.
    pub map: Option<MapResource>,
    /// Flocks in creation order.
    pub flocks: Vec<FlockSnapshot>,
}

impl WorldSnapshot {
    /// Number of living agents across all flocks.
    pub fn agents_alive(&self) -> usize {
        self.flocks
            .iter()
            .flat_map(|f| f.agents.iter())
            .filter(|a| a.alive)
            .count()
    }
}
