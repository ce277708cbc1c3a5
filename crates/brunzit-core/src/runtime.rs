//! The runtime: named groups, their behaviours, and global world state.
//!
//! A submitted line either targets the reserved `world` group, in which
//! case its actions run immediately and are never stored, or it targets an
//! existing group, in which case its actions replace that group's stored
//! [`Behaviour`]. Per-tick evaluation of the stored behaviours lives in
//! [`tick`](crate::tick).
//!
//! # Atomicity
//!
//! Every check that can reject a line runs before anything is mutated:
//! target lookup, compilation, verb placement, map extension, and reserved
//! names. The only failure that can follow a partial `world` line is the
//! media collaborator refusing a map, and then only actions earlier on the
//! same line have taken effect.
//!
//! # Shadowing
//!
//! `make` with a name that already exists adds a second flock under that
//! name. Name lookups resolve to the newest flock; older ones keep their
//! agents and keep rendering, but can no longer be addressed.

use std::borrow::Cow;
use std::collections::BTreeMap;

use brunzit_agents::{Flock, FlockConfig};
use brunzit_lang::{Compiler, Lexicon, Program, normalize_color_name, split_target};
use brunzit_types::{
    Action, Behaviour, FlockAction, MapKind, MapResource, Rgb, WORLD_GROUP, WorldAction,
    WorldSnapshot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::clock::FrameClock;
use crate::config::BrunzitConfig;
use crate::error::RuntimeError;
use crate::media::{MediaBackend, NullMedia};

/// What an accepted submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A group's behaviour was stored, replacing any previous one.
    Behaviour {
        /// The group addressed.
        group: String,
        /// Number of actions stored.
        actions: usize,
        /// Whether a previous behaviour was replaced.
        replaced: bool,
    },
    /// World actions ran.
    World {
        /// Number of world actions executed.
        actions: usize,
    },
}

/// Owner of every flock, every behaviour and the world state.
#[derive(Debug)]
pub struct Runtime {
    /// Flocks in creation order, shadowed ones included.
    pub(crate) flocks: Vec<Flock>,
    /// Distinct group names in order of first creation.
    pub(crate) group_order: Vec<String>,
    /// At most one behaviour per group name.
    pub(crate) behaviours: BTreeMap<String, Behaviour>,
    pub(crate) background: Rgb,
    pub(crate) map: Option<MapResource>,
    pub(crate) flock_config: FlockConfig,
    /// The shared standard tables unless replaced with [`Runtime::with_lexicon`].
    pub(crate) lexicon: Cow<'static, Lexicon>,
    pub(crate) rng: StdRng,
    pub(crate) media: Box<dyn MediaBackend>,
    pub(crate) clock: FrameClock,
}

impl Runtime {
    /// An empty world with a black background, the standard lexicon and
    /// [`NullMedia`].
    pub fn new(flock_config: FlockConfig, rng: StdRng) -> Self {
        Self {
            flocks: Vec::new(),
            group_order: Vec::new(),
            behaviours: BTreeMap::new(),
            background: Rgb::BLACK,
            map: None,
            flock_config,
            lexicon: Cow::Borrowed(Lexicon::shared()),
            rng,
            media: Box::new(NullMedia::new()),
            clock: FrameClock::default(),
        }
    }

    /// An empty world driven by a seeded RNG, for reproducible sessions.
    pub fn with_seed(flock_config: FlockConfig, seed: u64) -> Self {
        Self::new(flock_config, StdRng::seed_from_u64(seed))
    }

    /// Build a runtime from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Clock`] if the frame rate is zero.
    pub fn from_config(config: &BrunzitConfig) -> Result<Self, RuntimeError> {
        let rng = config
            .world
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let mut runtime = Self::new(config.flock_config(), rng);
        runtime.clock = FrameClock::new(config.world.frame_rate)?;
        runtime.background =
            runtime.resolve_color(&normalize_color_name(&config.world.background), Rgb::BLACK);
        Ok(runtime)
    }

    /// Replace the media collaborator.
    #[must_use]
    pub fn with_media(mut self, media: Box<dyn MediaBackend>) -> Self {
        self.media = media;
        self
    }

    /// Replace the icon and colour tables.
    #[must_use]
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Cow::Owned(lexicon);
        self
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Compile and submit one line of the command language.
    ///
    /// The target must be `world` or an existing group; that is checked
    /// before the actions are compiled. On any error nothing changes.
    pub fn execute(&mut self, line: &str) -> Result<Submission, RuntimeError> {
        let (target, _) = split_target(line)?;
        if target != WORLD_GROUP && !self.has_group(target) {
            return Err(RuntimeError::UnknownGroup {
                name: target.to_owned(),
            });
        }
        let program = Compiler::new(&self.lexicon).compile(line)?;
        self.submit(program)
    }

    /// Submit an already compiled program.
    pub fn submit(&mut self, program: Program) -> Result<Submission, RuntimeError> {
        if program.is_world() {
            self.run_world(program.actions)
        } else {
            self.store_behaviour(program.target, program.actions)
        }
    }

    fn store_behaviour(&mut self, group: String, actions: Vec<Action>) -> Result<Submission, RuntimeError> {
        if !self.has_group(&group) {
            return Err(RuntimeError::UnknownGroup { name: group });
        }

        let mut flock_actions: Vec<FlockAction> = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::Flock(action) => flock_actions.push(action),
                Action::World(action) => {
                    return Err(RuntimeError::WorldActionOnGroup {
                        verb: action.verb(),
                        group,
                    });
                }
            }
        }

        let count = flock_actions.len();
        let behaviour = Behaviour::new(group.clone(), flock_actions);
        let replaced = self.behaviours.insert(group.clone(), behaviour).is_some();
        info!(group, actions = count, replaced, "behaviour stored");
        Ok(Submission::Behaviour {
            group,
            actions: count,
            replaced,
        })
    }

    fn run_world(&mut self, actions: Vec<Action>) -> Result<Submission, RuntimeError> {
        let mut world: Vec<WorldAction> = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::World(action) => {
                    self.check_world_action(&action)?;
                    world.push(action);
                }
                Action::Flock(action) => {
                    return Err(RuntimeError::InvalidWorldAction {
                        verb: action.steer.verb(),
                    });
                }
            }
        }

        let count = world.len();
        for action in world {
            self.apply_world(action)?;
        }
        Ok(Submission::World { actions: count })
    }

    fn check_world_action(&self, action: &WorldAction) -> Result<(), RuntimeError> {
        let max = self.flock_config.max_group_size;
        match action {
            WorldAction::MakeGroup { name, .. } if name == WORLD_GROUP => Err(RuntimeError::ReservedGroupName {
                name: name.clone(),
            }),
            WorldAction::MakeGroup { name, count, .. } if *count > max => Err(RuntimeError::GroupTooLarge {
                name: name.clone(),
                count: *count,
                max,
            }),
            WorldAction::LoadMap { file } if MapKind::from_file(file).is_none() => {
                Err(RuntimeError::UnsupportedMapFormat { file: file.clone() })
            }
            WorldAction::MakeGroup { .. } | WorldAction::LoadMap { .. } | WorldAction::SetBackground { .. } => {
                Ok(())
            }
        }
    }

    fn apply_world(&mut self, action: WorldAction) -> Result<(), RuntimeError> {
        match action {
            WorldAction::MakeGroup {
                name,
                count,
                icon,
                color,
            } => {
                let rgb = self.resolve_color(&color, Rgb::WHITE);
                let flock = Flock::spawn(name, count, icon, rgb, self.flock_config, &mut self.rng)?;
                if self.has_group(flock.name()) {
                    warn!(group = flock.name(), "group name reused, newest group shadows the older one");
                } else {
                    self.group_order.push(flock.name().to_owned());
                }
                info!(
                    group = flock.name(),
                    flock = %flock.id(),
                    count,
                    glyph = flock.glyph(),
                    color,
                    "group created"
                );
                self.flocks.push(flock);
            }
            WorldAction::LoadMap { file } => {
                let kind = MapKind::from_file(&file).ok_or_else(|| RuntimeError::UnsupportedMapFormat {
                    file: file.clone(),
                })?;
                if let Err(e) = self.media.load_map(kind, &file) {
                    return Err(RuntimeError::MapLoad {
                        file,
                        reason: e.to_string(),
                    });
                }
                info!(file, ?kind, "map loaded");
                self.map = Some(MapResource { kind, file });
            }
            WorldAction::SetBackground { color } => {
                self.background = self.resolve_color(&color, Rgb::BLACK);
                info!(color, "background set");
            }
        }
        Ok(())
    }

    fn resolve_color(&self, name: &str, fallback: Rgb) -> Rgb {
        self.lexicon.color(name).unwrap_or_else(|| {
            warn!(color = name, "unknown colour name, using fallback");
            fallback
        })
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Whether a group with this name exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.group_order.iter().any(|g| g == name)
    }

    /// Distinct group names in creation order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.group_order.iter().map(String::as_str)
    }

    /// The behaviour stored for a group, if any.
    pub fn behaviour(&self, name: &str) -> Option<&Behaviour> {
        self.behaviours.get(name)
    }

    /// The newest flock with this name.
    pub fn flock(&self, name: &str) -> Option<&Flock> {
        self.flocks.iter().rev().find(|f| f.name() == name)
    }

    /// Every flock in creation order, shadowed ones included.
    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    /// Current background colour.
    pub const fn background(&self) -> Rgb {
        self.background
    }

    /// The loaded map resource, if any.
    pub const fn map(&self) -> Option<&MapResource> {
        self.map.as_ref()
    }

    /// The frame clock.
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The icon and colour tables.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Living agents across every flock.
    pub fn agents_alive(&self) -> usize {
        self.flocks.iter().map(Flock::alive_count).sum()
    }

    /// Read-only view of everything a renderer or synthesiser needs.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.clock.tick(),
            background: self.background,
            map: self.map.clone(),
            flocks: self.flocks.iter().map(Flock::snapshot).collect(),
        }
    }
}
