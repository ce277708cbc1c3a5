//! Enumeration types for the Brunzit simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// Probability that a [`Frequency::Sometimes`] action passes its gate.
pub const SOMETIMES_PROBABILITY: f32 = 0.3;

/// Probability that a [`Frequency::Often`] action passes its gate.
pub const OFTEN_PROBABILITY: f32 = 0.8;

/// How often a stored action executes on a given tick.
///
/// Every flock action carries one of these. [`Frequency::Once`] always
/// passes its gate but is removed from the behaviour after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Fires on the next tick, then is consumed.
    Once,
    /// Fires on roughly 30% of evaluations.
    Sometimes,
    /// Fires on roughly 80% of evaluations.
    Often,
    /// Fires on every evaluation.
    Always,
}

impl Frequency {
    /// Every frequency in keyword order.
    pub const ALL: [Self; 4] = [Self::Once, Self::Sometimes, Self::Often, Self::Always];

    /// Parse a command-language keyword (`once`, `sometimes`, `often`, `always`).
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "once" => Some(Self::Once),
            "sometimes" => Some(Self::Sometimes),
            "often" => Some(Self::Often),
            "always" => Some(Self::Always),
            _ => None,
        }
    }

    /// The command-language keyword for this frequency.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Sometimes => "sometimes",
            Self::Often => "often",
            Self::Always => "always",
        }
    }

    /// Decide whether a uniform sample in `[0, 1)` passes this gate.
    pub const fn admits(self, sample: f32) -> bool {
        match self {
            Self::Once | Self::Always => true,
            Self::Sometimes => sample < SOMETIMES_PROBABILITY,
            Self::Often => sample < OFTEN_PROBABILITY,
        }
    }

    /// Whether the action is removed from its behaviour after dispatch.
    pub const fn is_one_shot(self) -> bool {
        matches!(self, Self::Once)
    }
}

impl core::fmt::Display for Frequency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.keyword())
    }
}

// ---------------------------------------------------------------------------
// Map resources
// ---------------------------------------------------------------------------

/// The kind of resource a `map` world action loads.
///
/// Images drive the additive synthesis corpus, audio files are sliced into
/// a granular corpus. The kind is decided purely from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKind {
    /// A `.png` image.
    Image,
    /// A `.wav` audio file.
    Audio,
}

impl MapKind {
    /// Classify a file by extension (case-insensitive). Returns `None` for
    /// anything other than `.png` or `.wav`.
    pub fn from_file(file: &str) -> Option<Self> {
        let ext = Path::new(file).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Image)
        } else if ext.eq_ignore_ascii_case("wav") {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for freq in Frequency::ALL {
            assert_eq!(Frequency::from_keyword(freq.keyword()), Some(freq));
        }
        assert_eq!(Frequency::from_keyword("Often"), None);
        assert_eq!(Frequency::from_keyword("never"), None);
    }

    #[test]
    fn gate_thresholds() {
        assert!(Frequency::Once.admits(0.99));
        assert!(Frequency::Always.admits(0.99));
        assert!(Frequency::Sometimes.admits(0.29));
        assert!(!Frequency::Sometimes.admits(0.3));
        assert!(Frequency::Often.admits(0.79));
        assert!(!Frequency::Often.admits(0.8));
    }

    #[test]
    fn only_once_is_one_shot() {
        assert!(Frequency::Once.is_one_shot());
        assert!(!Frequency::Sometimes.is_one_shot());
        assert!(!Frequency::Often.is_one_shot());
        assert!(!Frequency::Always.is_one_shot());
    }

    #[test]
    fn map_kind_by_extension() {
        assert_eq!(MapKind::from_file("terrain.png"), Some(MapKind::Image));
        assert_eq!(MapKind::from_file("assets/drone.WAV"), Some(MapKind::Audio));
        assert_eq!(MapKind::from_file("score.mid"), None);
        assert_eq!(MapKind::from_file("noextension"), None);
    }
}
