//! Agents, flocks, and steering for the Brunzit simulation.
//!
//! This crate is the physics layer: it owns agent kinematics and executes
//! a single [`FlockAction`](brunzit_types::FlockAction) against a flock.
//! It knows nothing about source lines, behaviours, or ticks; those live in
//! `brunzit-lang` and `brunzit-core`.
//!
//! # Modules
//!
//! - [`agent`] -- Per-agent kinematics and motion primitives ([`Agent`])
//! - [`config`] -- Physical constants and the toroidal viewport ([`FlockConfig`])
//! - [`error`] -- Flock construction errors ([`FlockError`])
//! - [`flock`] -- Named agent groups and action dispatch ([`Flock`])
//! - [`steering`] -- Separation, cohesion, and alignment forces

pub mod agent;
pub mod config;
pub mod error;
pub mod flock;
pub mod steering;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, Cardinal, Voice, WANDER_MAX_DEGREES};
pub use config::{DEFAULT_MAX_GROUP_SIZE, FlockConfig, Viewport};
pub use error::FlockError;
pub use flock::{Dispatch, Flock};
pub use steering::{Body, SteeringLimits, SteeringRule, seek_force};
