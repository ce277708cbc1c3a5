//! Error types for the runtime.
//!
//! Every [`RuntimeError`] is recoverable: the rejected line has changed
//! nothing, and the caller can resubmit a corrected one.

use brunzit_agents::FlockError;
use brunzit_lang::CompileError;

use crate::clock::ClockError;

/// Errors returned when a line or program is rejected.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The line did not compile.
    #[error("compile error: {source}")]
    Compile {
        /// The underlying compile error.
        #[from]
        source: CompileError,
    },

    /// The line addresses a group that was never made.
    #[error("unknown group '{name}'")]
    UnknownGroup {
        /// The name as written.
        name: String,
    },

    /// A `world` line contains a steering verb.
    #[error("'{verb}' is not a world action")]
    InvalidWorldAction {
        /// The offending verb.
        verb: &'static str,
    },

    /// A group line contains a world verb.
    #[error("'{verb}' must be sent to world, not to group '{group}'")]
    WorldActionOnGroup {
        /// The offending verb.
        verb: &'static str,
        /// The group the line addressed.
        group: String,
    },

    /// `make` tried to create a group called `world`.
    #[error("'{name}' is reserved and cannot name a group")]
    ReservedGroupName {
        /// The rejected name.
        name: String,
    },

    /// `make` asked for more agents than one group may hold.
    #[error("group '{name}' cannot have {count} agents, the limit is {max}")]
    GroupTooLarge {
        /// The group being made.
        name: String,
        /// Requested count.
        count: u32,
        /// Configured maximum.
        max: u32,
    },

    /// `map` named a file that is neither `.png` nor `.wav`.
    #[error("unsupported map format: {file}")]
    UnsupportedMapFormat {
        /// Path as submitted.
        file: String,
    },

    /// The media collaborator refused the map resource.
    #[error("failed to load map {file}: {reason}")]
    MapLoad {
        /// Path as submitted.
        file: String,
        /// The collaborator's explanation.
        reason: String,
    },

    /// A new flock could not be created.
    #[error("flock error: {source}")]
    Flock {
        /// The underlying flock error.
        #[from]
        source: FlockError,
    },

    /// The frame clock could not be built or advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}
