//! Shared type definitions for the Brunzit simulation.
//!
//! This crate is the vocabulary every other Brunzit crate speaks: the
//! compiler produces [`Action`] values, the runtime stores them as
//! [`Behaviour`]s, and the flock layer executes them. Render and audio
//! collaborators only ever see the snapshot structs defined here.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for flocks and agents
//! - [`enums`] -- Frequency tags and map resource kinds
//! - [`actions`] -- The closed action vocabulary and behaviours
//! - [`structs`] -- Colours and read-only world snapshots

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, Behaviour, FlockAction, Neighbourhood, Steer, WorldAction};
pub use enums::{Frequency, MapKind};
pub use ids::{AgentId, FlockId};
pub use structs::{AgentSnapshot, FlockSnapshot, MapResource, Rgb, WorldSnapshot};

/// The reserved group name that addresses world-level actions.
pub const WORLD_GROUP: &str = "world";
