//! Per-frame evaluation of stored behaviours.
//!
//! Each tick:
//!
//! 1. Advance the frame clock.
//! 2. For every group name in creation order that has a stored behaviour,
//!    dispatch each action in compile order to the newest flock of that
//!    name. The flock applies the frequency gate.
//! 3. Drop every `once` action that was just dispatched and tell the media
//!    collaborator about agents that died.
//!
//! A behaviour whose actions were all `once` ends up empty. It stays
//! stored but does nothing until the group receives a new line.

use tracing::debug;

use crate::clock::ClockError;
use crate::runtime::Runtime;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Actions dispatched to flocks.
    pub dispatched: u32,
    /// One-shot actions removed after dispatch.
    pub consumed: u32,
    /// Agents that died during this tick.
    pub deaths: u32,
    /// Living agents across every flock at end of tick.
    pub agents_alive: usize,
}

impl Runtime {
    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter is
    /// exhausted. No behaviour is evaluated in that case.
    pub fn tick(&mut self) -> Result<TickSummary, ClockError> {
        let tick = self.clock.advance()?;
        let mut dispatched = 0_u32;
        let mut consumed = 0_u32;
        let mut deaths = 0_u32;

        for name in &self.group_order {
            let Some(behaviour) = self.behaviours.get_mut(name) else {
                continue;
            };
            let Some(flock) = self.flocks.iter_mut().rev().find(|f| f.name() == name) else {
                continue;
            };
            let rng = &mut self.rng;
            let media = &mut self.media;

            behaviour.actions.retain(|action| {
                let dispatch = flock.apply(action, rng);
                dispatched = dispatched.saturating_add(1);
                for &agent in &dispatch.deaths {
                    media.agent_died(flock.id(), agent);
                    deaths = deaths.saturating_add(1);
                }
                if action.frequency.is_one_shot() {
                    consumed = consumed.saturating_add(1);
                    false
                } else {
                    true
                }
            });
        }

        let summary = TickSummary {
            tick,
            dispatched,
            consumed,
            deaths,
            agents_alive: self.agents_alive(),
        };
        debug!(
            tick,
            dispatched,
            consumed,
            deaths,
            agents_alive = summary.agents_alive,
            "tick complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};

    use brunzit_agents::FlockConfig;
    use brunzit_types::{AgentId, FlockId, MapKind};
    use glam::Vec2;

    use super::*;
    use crate::media::{MediaBackend, MediaError};

    fn runtime() -> Runtime {
        Runtime::with_seed(FlockConfig::default(), 3)
    }

    #[derive(Debug)]
    struct DeathLog(Arc<Mutex<Vec<(FlockId, AgentId)>>>);

    impl MediaBackend for DeathLog {
        fn load_map(&mut self, _kind: MapKind, _file: &str) -> Result<(), MediaError> {
            Ok(())
        }

        fn agent_died(&mut self, flock: FlockId, agent: AgentId) {
            self.0.lock().unwrap().push((flock, agent));
        }
    }

    #[test]
    fn empty_world_ticks() {
        let mut rt = runtime();
        let summary = rt.tick().unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.dispatched, 0);
        assert_eq!(summary.agents_alive, 0);
        assert_eq!(rt.clock().tick(), 1);
    }

    #[test]
    fn one_shot_fires_once_then_vanishes() {
        let mut rt = runtime();
        rt.execute("world: make g 10").unwrap();
        rt.execute("g: stop").unwrap();

        let summary = rt.tick().unwrap();
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.consumed, 1);
        assert!(rt.flock("g").unwrap().agents().iter().all(|a| a.velocity() == Vec2::ZERO));
        assert!(rt.behaviour("g").unwrap().is_inert());

        let summary = rt.tick().unwrap();
        assert_eq!(summary.dispatched, 0);
    }

    #[test]
    fn repeating_actions_stay() {
        let mut rt = runtime();
        rt.execute("world: make g 4").unwrap();
        rt.execute("g: right, go 1").unwrap();
        for _ in 0..5 {
            rt.tick().unwrap();
        }
        let behaviour = rt.behaviour("g").unwrap();
        assert_eq!(behaviour.actions.len(), 1);
        assert!(behaviour.contains_verb("go"));
    }

    #[test]
    fn groups_without_behaviour_hold_still() {
        let mut rt = runtime();
        rt.execute("world: make g 3").unwrap();
        let before: Vec<Vec2> = rt.flock("g").unwrap().agents().iter().map(|a| a.position()).collect();
        rt.tick().unwrap();
        let after: Vec<Vec2> = rt.flock("g").unwrap().agents().iter().map(|a| a.position()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn deaths_reach_media() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut rt = runtime().with_media(Box::new(DeathLog(Arc::clone(&log))));
        rt.execute("world: make g 6").unwrap();
        rt.execute("g: die 1").unwrap();

        let summary = rt.tick().unwrap();
        assert_eq!(summary.deaths, 6);
        assert_eq!(summary.agents_alive, 0);
        let flock_id = rt.flock("g").unwrap().id();
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 6);
        assert!(log.iter().all(|(flock, _)| *flock == flock_id));
    }

    #[test]
    fn shadowed_group_is_not_driven() {
        let mut rt = runtime();
        rt.execute("world: make g 2").unwrap();
        rt.execute("world: make g 2").unwrap();
        rt.execute("g: stop").unwrap();
        rt.tick().unwrap();
        let old = &rt.flocks()[0];
        let new = &rt.flocks()[1];
        assert!(new.agents().iter().all(|a| a.velocity() == Vec2::ZERO));
        assert!(old.agents().iter().all(|a| a.velocity() != Vec2::ZERO));
    }
}
