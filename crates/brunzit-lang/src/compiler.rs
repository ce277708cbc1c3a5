//! Line compiler: `<group> : <clause> (, <clause>)*` into typed actions.
//!
//! Compilation is pure. It never looks at runtime state, so a failed line
//! cannot have touched anything. Whether the target group exists is the
//! runtime's call.
//!
//! Each clause is a verb followed by positional parameters. A trailing
//! frequency keyword is taken off first when the verb has a frequency slot;
//! the remaining parameters are then counted against the verb's contract
//! and converted left to right.

use brunzit_types::{Action, FlockAction, Frequency, Neighbourhood, Steer, WORLD_GROUP, WorldAction};
use tracing::debug;

use crate::error::CompileError;
use crate::lexicon::{Lexicon, normalize_color_name};

/// A successfully compiled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Group named before the `:`.
    pub target: String,
    /// One action per clause, in source order.
    pub actions: Vec<Action>,
}

impl Program {
    /// Whether the line addresses the reserved `world` group.
    pub fn is_world(&self) -> bool {
        self.target == WORLD_GROUP
    }
}

/// Split a line at its first `:` into trimmed group name and action text.
pub fn split_target(line: &str) -> Result<(&str, &str), CompileError> {
    let (name, body) = line
        .split_once(':')
        .ok_or(CompileError::MissingGroupSeparator)?;
    Ok((name.trim(), body))
}

/// Parameter shape of one verb.
#[derive(Debug, Clone, Copy)]
struct Contract {
    min: usize,
    max: usize,
    frequency_slot: bool,
}

impl Contract {
    const fn steer(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            frequency_slot: true,
        }
    }

    const fn world(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            frequency_slot: false,
        }
    }

    fn of(verb: &str) -> Option<Self> {
        let contract = match verb {
            "go" => Self::steer(0, 1),
            "up" | "down" | "left" | "right" | "stop" => Self::steer(0, 0),
            "turn" | "wander" | "die" | "volume" => Self::steer(1, 1),
            "seek" => Self::steer(2, 2),
            "avoid" | "join" | "align" => Self::steer(1, 3),
            "make" => Self::world(2, 4),
            "map" | "background" => Self::world(1, 1),
            _ => return None,
        };
        Some(contract)
    }

    /// Largest token count accepted, frequency keyword included.
    const fn max_tokens(self) -> usize {
        if self.frequency_slot {
            self.max.saturating_add(1)
        } else {
            self.max
        }
    }
}

/// Positional parameter reader for one clause.
struct Args<'t> {
    clause: usize,
    verb: &'t str,
    params: std::vec::IntoIter<&'t str>,
    contract: Contract,
    found: usize,
}

impl<'t> Args<'t> {
    fn count_error(&self) -> CompileError {
        CompileError::WrongArgumentCount {
            clause: self.clause,
            verb: self.verb.to_owned(),
            min: self.contract.min,
            max: self.contract.max_tokens(),
            found: self.found,
        }
    }

    fn type_error(&self, value: &str, expected: &'static str) -> CompileError {
        CompileError::WrongArgumentType {
            clause: self.clause,
            verb: self.verb.to_owned(),
            value: value.to_owned(),
            expected,
        }
    }

    fn word(&mut self) -> Result<&'t str, CompileError> {
        self.params.next().ok_or_else(|| self.count_error())
    }

    fn opt_word(&mut self) -> Option<&'t str> {
        self.params.next()
    }

    fn number(&mut self) -> Result<f32, CompileError> {
        let token = self.word()?;
        self.parse_number(token)
    }

    fn opt_number(&mut self) -> Result<Option<f32>, CompileError> {
        self.opt_word().map(|token| self.parse_number(token)).transpose()
    }

    fn parse_number(&self, token: &str) -> Result<f32, CompileError> {
        token
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.type_error(token, "a finite number"))
    }

    fn count(&mut self) -> Result<u32, CompileError> {
        let token = self.word()?;
        token
            .parse::<u32>()
            .ok()
            .ok_or_else(|| self.type_error(token, "a non-negative whole number"))
    }
}

/// Compiles command lines against a fixed [`Lexicon`].
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Compiler<'a> {
    /// Create a compiler that resolves icon aliases through `lexicon`.
    pub const fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Compile a whole line. Fails on the first bad clause; nothing partial
    /// is ever returned.
    pub fn compile(&self, line: &str) -> Result<Program, CompileError> {
        let (target, body) = split_target(line)?;

        let mut actions = Vec::new();
        for (index, clause) in body.split(',').enumerate() {
            if let Some(action) = self.compile_clause(index, clause)? {
                actions.push(action);
            }
        }
        if actions.is_empty() {
            return Err(CompileError::NoActions);
        }

        debug!(group = target, actions = actions.len(), "line compiled");
        Ok(Program {
            target: target.to_owned(),
            actions,
        })
    }

    /// Compile one clause. Blank clauses (`go, , stop`) yield `None`.
    fn compile_clause(&self, clause: usize, text: &str) -> Result<Option<Action>, CompileError> {
        let mut tokens = text.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };
        let contract = Contract::of(verb).ok_or_else(|| CompileError::UnknownVerb {
            clause,
            verb: verb.to_owned(),
        })?;

        let mut params: Vec<&str> = tokens.collect();
        let found = params.len();

        let mut frequency = None;
        if contract.frequency_slot
            && let Some(&last) = params.last()
        {
            if let Some(keyword) = Frequency::from_keyword(last) {
                frequency = Some(keyword);
                params.pop();
            } else if found == contract.max_tokens() {
                return Err(CompileError::UnknownFrequency {
                    clause,
                    verb: verb.to_owned(),
                    keyword: last.to_owned(),
                });
            }
        }

        let mut args = Args {
            clause,
            verb,
            params: params.into_iter(),
            contract,
            found,
        };
        let supplied = args.params.len();
        if supplied < contract.min || supplied > contract.max {
            return Err(args.count_error());
        }

        let action = if contract.frequency_slot {
            let action = FlockAction::new(Self::steer(&mut args)?);
            Action::Flock(match frequency {
                Some(frequency) => action.with_frequency(frequency),
                None => action,
            })
        } else {
            Action::World(self.world(&mut args)?)
        };
        Ok(Some(action))
    }

    fn steer(args: &mut Args<'_>) -> Result<Steer, CompileError> {
        let steer = match args.verb {
            "go" => Steer::Go {
                mult: args.opt_number()?.unwrap_or(1.0),
            },
            "up" => Steer::Up,
            "down" => Steer::Down,
            "left" => Steer::Left,
            "right" => Steer::Right,
            "stop" => Steer::Stop,
            "turn" => Steer::Turn {
                degrees: args.number()?,
            },
            "wander" => Steer::Wander {
                probability: args.number()?,
            },
            "die" => Steer::Die {
                probability: args.number()?,
            },
            "volume" => Steer::Volume {
                level: args.number()?,
            },
            "seek" => Steer::Seek {
                x: args.number()?,
                y: args.number()?,
            },
            "avoid" => Steer::Avoid(Self::neighbourhood(args)?),
            "join" => Steer::Join(Self::neighbourhood(args)?),
            "align" => Steer::Align(Self::neighbourhood(args)?),
            verb => {
                return Err(CompileError::UnknownVerb {
                    clause: args.clause,
                    verb: verb.to_owned(),
                });
            }
        };
        Ok(steer)
    }

    fn neighbourhood(args: &mut Args<'_>) -> Result<Neighbourhood, CompileError> {
        let threshold = args.number()?;
        let strength = args.opt_number()?.unwrap_or(Neighbourhood::DEFAULT_STRENGTH);
        let target = args.opt_word().map(str::to_owned);
        Ok(Neighbourhood {
            threshold,
            strength,
            target,
        })
    }

    fn world(&self, args: &mut Args<'_>) -> Result<WorldAction, CompileError> {
        let action = match args.verb {
            "make" => {
                let name = args.word()?.to_owned();
                let count = args.count()?;
                let icon = args
                    .opt_word()
                    .map_or_else(|| WorldAction::DEFAULT_ICON.to_owned(), |word| self.lexicon.glyph(word));
                let color = args
                    .opt_word()
                    .map_or_else(|| WorldAction::DEFAULT_COLOR.to_owned(), normalize_color_name);
                WorldAction::MakeGroup {
                    name,
                    count,
                    icon,
                    color,
                }
            }
            "map" => WorldAction::LoadMap {
                file: args.word()?.to_owned(),
            },
            "background" => WorldAction::SetBackground {
                color: normalize_color_name(args.word()?),
            },
            verb => {
                return Err(CompileError::UnknownVerb {
                    clause: args.clause,
                    verb: verb.to_owned(),
                });
            }
        };
        Ok(action)
    }
}
