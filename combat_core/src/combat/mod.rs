//! Combat resolution - Apply damage events to the world

mod resolution;
mod result;

pub use resolution::resolve_damage;
pub use result::{DeathReport, Outcome, Resolution};

use crate::config::CombatConfig;
use crate::events::EventSink;
use crate::random::RandomStreams;
use crate::threat::MatchState;
use crate::world::World;

/// Everything a resolution reads or mutates
///
/// Built by the owner of the simulation for each call; nothing here is
/// global.
pub struct CombatContext<'a> {
    pub world: &'a mut World,
    pub match_state: &'a mut MatchState,
    pub rng: &'a mut RandomStreams,
    pub config: &'a CombatConfig,
    pub events: &'a mut dyn EventSink,
}

impl<'a> CombatContext<'a> {
    pub fn new(
        world: &'a mut World,
        match_state: &'a mut MatchState,
        rng: &'a mut RandomStreams,
        config: &'a CombatConfig,
        events: &'a mut dyn EventSink,
    ) -> Self {
        CombatContext {
            world,
            match_state,
            rng,
            config,
            events,
        }
    }
}
