//! Runtime, frame clock, and session loop for the Brunzit simulation.
//!
//! This crate ties the compiler in `brunzit-lang` to the flocks in
//! `brunzit-agents`. The [`Runtime`] owns every group and behaviour and
//! answers one submitted line at a time; [`Runtime::tick`] re-evaluates the
//! stored behaviours once per frame.
//!
//! # Modules
//!
//! - [`clock`] -- Frame counter and cadence ([`FrameClock`])
//! - [`config`] -- Configuration loading from `brunzit-config.yaml`
//! - [`error`] -- Submission errors ([`RuntimeError`])
//! - [`media`] -- [`MediaBackend`] trait and [`NullMedia`]
//! - [`runner`] -- Async session loop interleaving ticks and input lines
//! - [`runtime`] -- Groups, behaviours, world actions, snapshots
//! - [`tick`] -- Per-frame behaviour evaluation ([`TickSummary`])
//!
//! [`FrameClock`]: clock::FrameClock
//! [`RuntimeError`]: error::RuntimeError
//! [`MediaBackend`]: media::MediaBackend
//! [`NullMedia`]: media::NullMedia
//! [`Runtime`]: runtime::Runtime
//! [`Runtime::tick`]: runtime::Runtime::tick
//! [`TickSummary`]: tick::TickSummary

pub mod clock;
pub mod config;
pub mod error;
pub mod media;
pub mod runner;
pub mod runtime;
pub mod tick;

pub use error::RuntimeError;
pub use runtime::{Runtime, Submission};
pub use tick::TickSummary;
