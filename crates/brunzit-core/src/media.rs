//! The render/audio collaborator boundary.
//!
//! The runtime never draws or plays anything itself. It tells a
//! [`MediaBackend`] when a map resource should be loaded and when an agent
//! has died, and collaborators read everything else from
//! [`Runtime::snapshot`](crate::runtime::Runtime::snapshot).
//!
//! [`NullMedia`] accepts every request and does nothing, which is what the
//! headless engine and most tests want.

use brunzit_types::{AgentId, FlockId, MapKind};

/// Errors a media backend can report.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The resource does not exist.
    #[error("resource not found: {file}")]
    NotFound {
        /// Path as submitted.
        file: String,
    },

    /// The resource exists but could not be used.
    #[error("resource {file} rejected: {reason}")]
    Rejected {
        /// Path as submitted.
        file: String,
        /// Why the backend refused it.
        reason: String,
    },
}

/// Render and audio collaborator.
pub trait MediaBackend: std::fmt::Debug {
    /// Load an image or audio map into the sound corpus.
    ///
    /// `kind` has already been decided from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] if the resource cannot be loaded. The runtime
    /// keeps its previous map in that case.
    fn load_map(&mut self, kind: MapKind, file: &str) -> Result<(), MediaError>;

    /// Silence the voice of an agent that just died.
    fn agent_died(&mut self, flock: FlockId, agent: AgentId);
}

/// A backend that accepts everything and renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMedia;

impl NullMedia {
    /// Create a new null backend.
    pub const fn new() -> Self {
        Self
    }
}

impl MediaBackend for NullMedia {
    fn load_map(&mut self, _kind: MapKind, _file: &str) -> Result<(), MediaError> {
        Ok(())
    }

    fn agent_died(&mut self, _flock: FlockId, _agent: AgentId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_media_accepts_everything() {
        let mut media = NullMedia::new();
        assert!(media.load_map(MapKind::Image, "anything.png").is_ok());
        assert!(media.load_map(MapKind::Audio, "").is_ok());
        media.agent_died(FlockId::new(), AgentId::new());
    }
}
