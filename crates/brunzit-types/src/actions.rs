//! The closed action vocabulary shared by the compiler, runtime and flocks.
//!
//! Actions split in two at the type level:
//!
//! - [`FlockAction`] -- a [`Steer`] plus its [`Frequency`]. These are the only
//!   actions a [`Behaviour`] can hold, and the runtime re-evaluates them every
//!   tick.
//! - [`WorldAction`] -- `make`, `map` and `background`. They mutate global
//!   state, execute once at submission, and carry no frequency.
//!
//! Every variant carries exactly the fields its verb needs.

use serde::{Deserialize, Serialize};

use crate::enums::Frequency;

// ---------------------------------------------------------------------------
// Flock actions
// ---------------------------------------------------------------------------

/// Parameters shared by the three neighbour-based steering algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbourhood {
    /// Neighbours strictly closer than this distance are considered.
    pub threshold: f32,
    /// Multiplier applied to the clamped steering force.
    pub strength: f32,
    /// Named group to steer relative to. Accepted by the grammar, but the
    /// neighbour search always scans the invoking flock's own members.
    pub target: Option<String>,
}

impl Neighbourhood {
    /// Strength used when the command omits it.
    pub const DEFAULT_STRENGTH: f32 = 1.0;

    /// A neighbourhood with default strength and no target.
    pub const fn new(threshold: f32) -> Self {
        Self {
            threshold,
            strength: Self::DEFAULT_STRENGTH,
            target: None,
        }
    }
}

/// What a flock action does to the agents of its group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Steer {
    /// Integrate one step, then displace by `velocity * mult` and wrap.
    Go {
        /// Extra displacement multiplier.
        mult: f32,
    },
    /// Point velocity straight up the screen (`-y`).
    Up,
    /// Point velocity straight down the screen (`+y`).
    Down,
    /// Point velocity left (`-x`).
    Left,
    /// Point velocity right (`+x`).
    Right,
    /// Rotate velocity by an angle.
    Turn {
        /// Rotation in degrees, counter-clockwise in maths orientation.
        degrees: f32,
    },
    /// Zero velocity and pending acceleration.
    Stop,
    /// Kill each agent with the given probability.
    Die {
        /// Per-agent death probability in `[0, 1]`.
        probability: f32,
    },
    /// Spread a volume level evenly over the group's voices.
    Volume {
        /// Total level for the whole group.
        level: f32,
    },
    /// Point velocity at a screen position.
    Seek {
        /// Target x coordinate.
        x: f32,
        /// Target y coordinate.
        y: f32,
    },
    /// Randomly jitter heading by up to 90 degrees either way.
    Wander {
        /// Per-agent probability of a jitter.
        probability: f32,
    },
    /// Separation: steer away from close neighbours.
    Avoid(Neighbourhood),
    /// Cohesion: steer toward the neighbours' centroid.
    Join(Neighbourhood),
    /// Alignment: steer toward the neighbours' mean heading.
    Align(Neighbourhood),
}

impl Steer {
    /// The command-language verb for this action.
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Go { .. } => "go",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Turn { .. } => "turn",
            Self::Stop => "stop",
            Self::Die { .. } => "die",
            Self::Volume { .. } => "volume",
            Self::Seek { .. } => "seek",
            Self::Wander { .. } => "wander",
            Self::Avoid(_) => "avoid",
            Self::Join(_) => "join",
            Self::Align(_) => "align",
        }
    }

    /// The frequency used when the command does not name one.
    pub const fn default_frequency(&self) -> Frequency {
        match self {
            Self::Go { .. } | Self::Seek { .. } | Self::Avoid(_) | Self::Join(_) | Self::Align(_) => {
                Frequency::Always
            }
            Self::Wander { .. } => Frequency::Often,
            Self::Up
            | Self::Down
            | Self::Left
            | Self::Right
            | Self::Turn { .. }
            | Self::Stop
            | Self::Die { .. }
            | Self::Volume { .. } => Frequency::Once,
        }
    }

    /// Whether this action runs as one pass over the whole flock (a single
    /// frequency draw) rather than once per agent.
    pub const fn is_flock_pass(&self) -> bool {
        matches!(self, Self::Avoid(_) | Self::Join(_) | Self::Align(_))
    }
}

/// A steering action bound to its frequency gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockAction {
    /// What the action does.
    pub steer: Steer,
    /// How often it fires.
    pub frequency: Frequency,
}

impl FlockAction {
    /// Wrap a steer with its verb's default frequency.
    pub const fn new(steer: Steer) -> Self {
        let frequency = steer.default_frequency();
        Self { steer, frequency }
    }

    /// Replace the frequency.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }
}

// ---------------------------------------------------------------------------
// World actions
// ---------------------------------------------------------------------------

/// An action addressed to the reserved `world` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldAction {
    /// Create a new group of agents.
    MakeGroup {
        /// Group name used by later commands.
        name: String,
        /// Number of agents to spawn.
        count: u32,
        /// Glyph used to draw each agent, icon aliases already resolved.
        icon: String,
        /// Colour name (first letter upper-cased).
        color: String,
    },
    /// Load an image or audio map resource.
    LoadMap {
        /// Asset path as typed.
        file: String,
    },
    /// Change the background colour.
    SetBackground {
        /// Colour name (first letter upper-cased).
        color: String,
    },
}

impl WorldAction {
    /// Glyph used when `make` omits an icon.
    pub const DEFAULT_ICON: &'static str = "\u{25b6}";
    /// Colour used when `make` omits one.
    pub const DEFAULT_COLOR: &'static str = "White";

    /// The command-language verb for this action.
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::MakeGroup { .. } => "make",
            Self::LoadMap { .. } => "map",
            Self::SetBackground { .. } => "background",
        }
    }
}

// ---------------------------------------------------------------------------
// Action + Behaviour
// ---------------------------------------------------------------------------

/// One compiled clause of a command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A steering action for a named group.
    Flock(FlockAction),
    /// A world-level action.
    World(WorldAction),
}

impl Action {
    /// The command-language verb for this action.
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Flock(action) => action.steer.verb(),
            Self::World(action) => action.verb(),
        }
    }
}

impl From<FlockAction> for Action {
    fn from(action: FlockAction) -> Self {
        Self::Flock(action)
    }
}

impl From<WorldAction> for Action {
    fn from(action: WorldAction) -> Self {
        Self::World(action)
    }
}

/// The ordered action list currently bound to one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behaviour {
    /// Name of the group this behaviour drives.
    pub group: String,
    /// Actions in compile order. One-shot actions disappear after firing.
    pub actions: Vec<FlockAction>,
}

impl Behaviour {
    /// Create a behaviour for a group.
    pub const fn new(group: String, actions: Vec<FlockAction>) -> Self {
        Self { group, actions }
    }

    /// Whether every action has been consumed.
    pub fn is_inert(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether the behaviour still holds an action with the given verb.
    pub fn contains_verb(&self, verb: &str) -> bool {
        self.actions.iter().any(|a| a.steer.verb() == verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frequencies_follow_verb_table() {
        assert_eq!(FlockAction::new(Steer::Go { mult: 1.0 }).frequency, Frequency::Always);
        assert_eq!(FlockAction::new(Steer::Seek { x: 0.0, y: 0.0 }).frequency, Frequency::Always);
        assert_eq!(
            FlockAction::new(Steer::Avoid(Neighbourhood::new(10.0))).frequency,
            Frequency::Always
        );
        assert_eq!(FlockAction::new(Steer::Wander { probability: 0.5 }).frequency, Frequency::Often);
        assert_eq!(FlockAction::new(Steer::Turn { degrees: 10.0 }).frequency, Frequency::Once);
        assert_eq!(FlockAction::new(Steer::Stop).frequency, Frequency::Once);
        assert_eq!(FlockAction::new(Steer::Volume { level: 0.1 }).frequency, Frequency::Once);
        assert_eq!(FlockAction::new(Steer::Die { probability: 0.1 }).frequency, Frequency::Once);
    }

    #[test]
    fn verbs() {
        let action = Action::from(FlockAction::new(Steer::Join(Neighbourhood::new(5.0))));
        assert_eq!(action.verb(), "join");
        let world = Action::from(WorldAction::LoadMap { file: "a.png".to_owned() });
        assert_eq!(world.verb(), "map");
    }

    #[test]
    fn behaviour_inspection() {
        let behaviour = Behaviour::new(
            "birds".to_owned(),
            vec![FlockAction::new(Steer::Stop), FlockAction::new(Steer::Up)],
        );
        assert!(behaviour.contains_verb("stop"));
        assert!(!behaviour.contains_verb("go"));
        assert!(!behaviour.is_inert());
    }

    #[test]
    fn flock_action_serializes() {
        let action = FlockAction::new(Steer::Go { mult: 1.5 });
        let json = serde_json::to_string(&action).unwrap_or_default();
        assert!(json.contains("\"Go\""));
        assert!(json.contains("\"Always\""));
    }
}
