//! Error types for the brunzit-agents crate.

/// Errors that can occur while creating a flock.
#[derive(Debug, thiserror::Error)]
pub enum FlockError {
    /// The viewport has a zero, negative or non-finite dimension.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },

    /// The requested agent count exceeds the configured maximum.
    #[error("cannot spawn {count} agents, the limit is {max}")]
    GroupTooLarge {
        /// Requested count.
        count: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A physical constant is zero, negative or non-finite.
    #[error("invalid flock constant {name} = {value}")]
    InvalidConstant {
        /// Name of the constant.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
}
