//! Simulation - Owns the world and drives damage resolution tic by tic

use crate::combat::{resolve_damage, CombatContext, Resolution};
use crate::combatant::{Combatant, PlayerPawn, ReadyWeapon};
use crate::config::{
    ClassRegistry, CombatConfig, CombatantClass, DamageTypeRegistry, Scenario, ScenarioError, ScenarioHit,
};
use crate::damage::DamageEvent;
use crate::events::CombatEvent;
use crate::random::RandomStreams;
use crate::threat::MatchState;
use crate::types::EntityId;
use crate::world::World;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A world, its match counters and everything needed to resolve hits
///
/// The world is only readable from outside; combatants are added through
/// the spawn methods and hurt through [`Simulation::damage`].
pub struct Simulation {
    world: World,
    pub match_state: MatchState,
    pub rng: RandomStreams,
    pub config: CombatConfig,
    pub classes: ClassRegistry,
    events: Vec<CombatEvent>,
}

impl Simulation {
    pub fn new(config: CombatConfig, seed: u64) -> Self {
        Simulation {
            world: World::new(),
            match_state: MatchState::new(),
            rng: RandomStreams::new(seed),
            config,
            classes: ClassRegistry::new(),
            events: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn spawn(&mut self, class: Arc<CombatantClass>) -> EntityId {
        self.world.spawn(class)
    }

    /// Spawn a combatant of `class`, letting `build` customise it first
    pub fn spawn_with(&mut self, class: Arc<CombatantClass>, build: impl FnOnce(Combatant) -> Combatant) -> EntityId {
        self.world.spawn_with(class, build)
    }

    pub fn spawn_player(&mut self, class: Arc<CombatantClass>, pawn: PlayerPawn) -> EntityId {
        self.world.spawn_player(class, pawn)
    }

    pub(crate) fn context(&mut self) -> CombatContext<'_> {
        CombatContext::new(
            &mut self.world,
            &mut self.match_state,
            &mut self.rng,
            &self.config,
            &mut self.events,
        )
    }

    /// Resolve one damage event, then clear out removed combatants
    pub fn damage(&mut self, event: &DamageEvent) -> Resolution {
        let resolution = resolve_damage(&mut self.context(), event);
        for id in self.world.sweep_destroyed() {
            debug!(%id, "combatant removed");
        }
        resolution
    }

    /// Advance the level clock, ticking the world once per tic
    pub fn advance(&mut self, tics: u32) {
        for _ in 0..tics {
            self.match_state.advance(1);
            self.world.tick();
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Take every event raised so far
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Build a simulation from a scenario, returning it with the name to id map
    pub fn from_scenario(scenario: &Scenario) -> Result<(Self, HashMap<String, EntityId>), ScenarioError> {
        scenario.validate()?;
        let config = CombatConfig::new(
            scenario.constants.clone(),
            scenario.rules.clone(),
            DamageTypeRegistry::from_defs(scenario.damage_types.clone()),
        );
        let mut sim = Simulation::new(config, scenario.seed);
        sim.classes = ClassRegistry::from_classes(scenario.classes.clone())?;

        let mut ids = HashMap::new();
        for spawn in &scenario.spawns {
            let class = sim
                .classes
                .get(&spawn.class)
                .ok_or_else(|| ScenarioError::UnknownClass(spawn.class.clone()))?;

            let pawn = spawn.player.map(|slot| {
                let mut pawn = PlayerPawn::new(slot).with_cheats(spawn.cheats);
                if spawn.bot {
                    pawn = pawn.as_bot();
                }
                pawn.ready_weapon = spawn.kickback.map(ReadyWeapon::new);
                pawn
            });

            let id = sim.spawn_with(class, |mut c| {
                if let Some(pawn) = pawn {
                    c = c.with_player(pawn);
                }
                if let Some(health) = spawn.health {
                    c = c.with_health(health);
                }
                for item in &spawn.items {
                    c = item.give(c);
                }
                c.team = spawn.team;
                c.friend_player = spawn.friend_player;
                c.special = spawn.special;
                c.with_flags(spawn.flags).with_position(DVec3::from_array(spawn.position))
            });
            ids.insert(spawn.name.clone(), id);
        }

        for spawn in &scenario.spawns {
            let Some(master) = &spawn.tracer else { continue };
            let tracer = lookup(&ids, master)?;
            if let Some(c) = sim.world.get_mut(ids[&spawn.name]) {
                c.tracer = Some(tracer);
            }
        }

        info!(scenario = %scenario.name, combatants = sim.world.len(), "scenario loaded");
        Ok((sim, ids))
    }

    /// Replay a scenario's hits in tic order
    pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
        let (mut sim, ids) = Self::from_scenario(scenario)?;

        let mut hits: Vec<&ScenarioHit> = scenario.hits.iter().collect();
        hits.sort_by_key(|h| h.tic);

        let mut records = Vec::with_capacity(hits.len());
        for hit in hits {
            if hit.tic > sim.match_state.level_time {
                sim.advance(hit.tic - sim.match_state.level_time);
            }
            let event = to_event(hit, &ids)?;
            let resolution = sim.damage(&event);
            info!(tic = hit.tic, summary = %resolution.summary(), "hit");
            records.push(HitRecord {
                tic: hit.tic,
                target: hit.target.clone(),
                resolution,
            });
        }

        let mut survivors: Vec<(String, i32)> = ids
            .iter()
            .filter_map(|(name, id)| sim.world().health(*id).map(|h| (name.clone(), h)))
            .collect();
        survivors.sort();

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            hits: records,
            events: sim.drain_events(),
            match_state: sim.match_state,
            health: survivors,
        })
    }
}

fn lookup(ids: &HashMap<String, EntityId>, name: &str) -> Result<EntityId, ScenarioError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| ScenarioError::UnknownCombatant(name.to_string()))
}

fn to_event(hit: &ScenarioHit, ids: &HashMap<String, EntityId>) -> Result<DamageEvent, ScenarioError> {
    let mut event = DamageEvent::new(lookup(ids, &hit.target)?, hit.amount)
        .of_kind(hit.kind.clone())
        .with_flags(hit.flags);
    if let Some(inflictor) = &hit.inflictor {
        event = event.from_inflictor(lookup(ids, inflictor)?);
    }
    if let Some(source) = &hit.source {
        event = event.from_source(lookup(ids, source)?);
    }
    Ok(event)
}

/// One replayed hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitRecord {
    pub tic: u32,
    pub target: String,
    pub resolution: Resolution,
}

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub hits: Vec<HitRecord>,
    pub events: Vec<CombatEvent>,
    pub match_state: MatchState,
    /// Final health of every combatant still in the world, by name
    pub health: Vec<(String, i32)>,
}

impl ScenarioReport {
    pub fn deaths(&self) -> usize {
        self.hits.iter().filter(|h| h.resolution.is_lethal()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_scenario;

    #[test]
    fn test_damage_sweeps_removed() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let mut class = CombatantClass::monster("Wisp", 5);
        class.states = Default::default();
        let id = sim.spawn(Arc::new(class));

        let resolution = sim.damage(&DamageEvent::new(id, 10));
        assert!(resolution.is_lethal());
        assert!(!sim.world().contains(id));
        assert!(sim.events().contains(&CombatEvent::Destroyed { id }));
    }

    #[test]
    fn test_advance_moves_clock() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        sim.advance(12);
        assert_eq!(sim.match_state.level_time, 12);
        assert_eq!(sim.match_state.map_time, 12);
    }

    #[test]
    fn test_unknown_class() {
        let scenario = parse_scenario(
            r#"
[[spawn]]
name = "x"
class = "Nothing"
"#,
        )
        .unwrap();
        assert!(matches!(
            Simulation::from_scenario(&scenario),
            Err(ScenarioError::UnknownClass(name)) if name == "Nothing"
        ));
    }

    #[test]
    fn test_run_scenario_kills_monster() {
        let scenario = parse_scenario(
            r#"
name = "imp"

[[classes]]
name = "Imp"
spawn_health = 10
pain_chance = 200
flags = "SHOOTABLE | SOLID | IS_MONSTER | COUNT_KILL"

[classes.states]
Spawn = 10
Death = 5

[[spawn]]
name = "imp"
class = "Imp"

[[hit]]
tic = 3
target = "imp"
amount = 15
"#,
        )
        .unwrap();

        let report = Simulation::run_scenario(&scenario).unwrap();
        assert_eq!(report.deaths(), 1);
        assert_eq!(report.match_state.killed_monsters, 1);
        assert_eq!(report.match_state.level_time, 3);
        assert_eq!(report.health, vec![("imp".to_string(), -5)]);
    }
}
