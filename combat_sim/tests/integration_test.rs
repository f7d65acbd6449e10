//! Integration test: Load scenario -> Spawn combatants -> Replay hits -> Score
//!
//! Validates the whole flow from TOML to resolutions and match counters.

use combat_core::combatant::StateTable;
use combat_core::config::{load_scenario, parse_scenario, CombatantClass};
use combat_core::prelude::*;
use combat_core::simulation::ScenarioReport;
use std::path::Path;
use std::sync::Arc;

fn run(toml: &str) -> ScenarioReport {
    let scenario = parse_scenario(toml).unwrap();
    Simulation::run_scenario(&scenario).unwrap()
}

fn imp(gib_health: i32) -> CombatantClass {
    let mut class = CombatantClass::monster("Imp", 60);
    class.gib_health = Some(gib_health);
    class.pain_chance = 0;
    class.states = StateTable::new()
        .with("Spawn", 10)
        .with("Death", 8)
        .with("Death.Extreme", 6);
    class
}

#[test]
fn test_duel_scenario_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/duel.toml");
    let scenario = load_scenario(&path).unwrap();
    let report = Simulation::run_scenario(&scenario).unwrap();

    assert_eq!(report.hits.len(), 6);

    // Green-ish armor soaks floor(24 * 0.33) = 7
    let torched = &report.hits[0].resolution;
    assert_eq!(torched.damage, 17);
    assert_eq!(torched.health_after, Some(83));

    // Imps take half damage from fire
    let burned = &report.hits[2].resolution;
    assert_eq!(burned.damage, 20);
    assert_eq!(burned.health_after, Some(40));

    let fragged = report.hits[3].resolution.death().expect("ranger should die");
    assert!(fragged.credited.is_some());
    assert_eq!(fragged.presentation, DeathPresentation::Normal);
    assert_eq!(fragged.kill.as_ref().map(|k| k.frag_delta), Some(1));
    assert_eq!(fragged.kill.as_ref().and_then(|k| k.multikill), Some(MultikillTier::Single));

    assert!(report.hits[4].resolution.is_rejected(), "corpses ignore damage");

    let gibbed = report.hits[5].resolution.death().expect("imp should die");
    assert_eq!(gibbed.presentation, DeathPresentation::Extreme);
    assert_eq!(report.hits[5].resolution.health_after, Some(-110));

    assert_eq!(report.deaths(), 2);
    assert_eq!(report.match_state.killed_monsters, 1);
    let doomguy = report.match_state.score(0).unwrap();
    assert_eq!(doomguy.frag_count, 1);
    assert_eq!(doomguy.kill_count, 1);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::Obituary { .. })));
}

#[test]
fn test_lethal_hit_on_monster() {
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let id = sim.spawn_with(Arc::new(imp(-20)), |c| c.with_health(10));

    let resolution = sim.damage(&DamageEvent::new(id, 15));
    let death = resolution.death().expect("lethal");
    assert_eq!(resolution.damage, 15);
    assert_eq!(resolution.health_after, Some(-5));
    assert_eq!(death.presentation, DeathPresentation::Normal);
    assert_eq!(sim.match_state.killed_monsters, 1);

    let corpse = sim.world().get(id).unwrap();
    assert!(corpse.flags.contains(ActorFlags::KILLED | ActorFlags::CORPSE));
    assert!(!corpse.flags.contains(ActorFlags::SHOOTABLE));
}

#[test]
fn test_gib_boundary() {
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let normal = sim.spawn_with(Arc::new(imp(-20)), |c| c.with_health(10));
    let gibbed = sim.spawn_with(Arc::new(imp(-20)), |c| c.with_health(10));

    let at_boundary = sim.damage(&DamageEvent::new(normal, 30));
    let past_boundary = sim.damage(&DamageEvent::new(gibbed, 31));

    assert_eq!(at_boundary.death().map(|d| d.presentation.clone()), Some(DeathPresentation::Normal));
    assert_eq!(past_boundary.death().map(|d| d.presentation.clone()), Some(DeathPresentation::Extreme));
    assert_eq!(sim.world().health(gibbed), Some(-21));
}

#[test]
fn test_invulnerable_monster() {
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let id = sim.spawn_with(Arc::new(imp(-20)), |c| c.with_flags(ActorFlags::INVULNERABLE));

    let resolution = sim.damage(&DamageEvent::new(id, 50));
    assert!(resolution.is_rejected());
    assert_eq!(sim.world().health(id), Some(60));

    let telefrag = sim.damage(&DamageEvent::new(id, 1_000_000));
    assert!(telefrag.is_lethal());
    assert!(sim.world().health(id).unwrap() <= 0);
}

#[test]
fn test_foil_invulnerability_flag() {
    let mut sim = Simulation::new(CombatConfig::default(), 1);
    let id = sim.spawn_with(Arc::new(imp(-20)), |c| c.with_flags(ActorFlags::INVULNERABLE));

    let resolution = sim.damage(&DamageEvent::new(id, 25).with_flags(DamageFlags::FOIL_INVUL));
    assert_eq!(resolution.damage, 25);
    assert_eq!(sim.world().health(id), Some(35));
}

const COOP: &str = r#"
name = "friendly fire"

[rules]
multiplayer = true
team_damage = 0.0

[[classes]]
name = "Marine"
spawn_health = 100
pain_chance = 0
flags = "SHOOTABLE | SOLID"

[classes.states]
Spawn = -1
Pain = 4
Death = 10

[[classes]]
name = "Plasma"
flags = "MISSILE | NO_GRAVITY | FORCE_PAIN"

[[classes]]
name = "Bullet"
flags = "MISSILE | NO_GRAVITY"

[[spawn]]
name = "one"
class = "Marine"
player = 0

[[spawn]]
name = "two"
class = "Marine"
player = 1
position = [64.0, 0.0, 0.0]

[[spawn]]
name = "plasma"
class = "Plasma"
position = [32.0, 0.0, 0.0]

[[spawn]]
name = "bullet"
class = "Bullet"
position = [32.0, 0.0, 0.0]

[[hit]]
tic = 5
target = "two"
inflictor = "bullet"
source = "one"
amount = 20

[[hit]]
tic = 6
target = "two"
inflictor = "plasma"
source = "one"
amount = 20
"#;

#[test]
fn test_team_damage_zero() {
    let report = run(COOP);

    let plain = &report.hits[0].resolution;
    assert!(plain.is_rejected(), "teammate hit without pain force is dropped");

    let forced = &report.hits[1].resolution;
    assert_eq!(forced.outcome, Outcome::ZeroDamagePain(Reaction::Pain));
    assert_eq!(forced.damage, 0);
    assert_eq!(forced.health_after, Some(100));
}

const MASSACRE: &str = r#"
name = "multikill"

[rules]
deathmatch = true
multiplayer = true

[[classes]]
name = "Marine"
spawn_health = 100
flags = "SHOOTABLE | SOLID"

[classes.states]
Spawn = -1
Death = 10

[[spawn]]
name = "shooter"
class = "Marine"
player = 0

[[spawn]]
name = "a"
class = "Marine"
player = 1

[[spawn]]
name = "b"
class = "Marine"
player = 2

[[spawn]]
name = "c"
class = "Marine"
player = 3

[[spawn]]
name = "d"
class = "Marine"
player = 4

[[hit]]
tic = 10
target = "a"
source = "shooter"
amount = 200

[[hit]]
tic = 20
target = "b"
source = "shooter"
amount = 200

[[hit]]
tic = 30
target = "c"
source = "shooter"
amount = 200

[[hit]]
tic = 400
target = "d"
source = "shooter"
amount = 200
"#;

#[test]
fn test_multikill_tiers() {
    let report = run(MASSACRE);
    let tiers: Vec<Option<MultikillTier>> = report
        .hits
        .iter()
        .map(|h| h.resolution.death().and_then(|d| d.kill.as_ref()).and_then(|k| k.multikill))
        .collect();
    assert_eq!(
        tiers,
        vec![
            Some(MultikillTier::Single),
            Some(MultikillTier::Double),
            Some(MultikillTier::Multi),
            Some(MultikillTier::Single),
        ]
    );

    let announced: Vec<MultikillTier> = report
        .events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::Multikill { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect();
    assert_eq!(announced, vec![MultikillTier::Double, MultikillTier::Multi]);
    assert_eq!(report.match_state.score(0).unwrap().frag_count, 4);
}

#[test]
fn test_buddha_player_survives() {
    let report = run(r#"
[[classes]]
name = "Marine"
spawn_health = 100
flags = "SHOOTABLE | SOLID"

[classes.states]
Death = 10

[[spawn]]
name = "monk"
class = "Marine"
player = 0
cheats = "BUDDHA"

[[hit]]
target = "monk"
amount = 500

[[hit]]
target = "monk"
amount = 1000000
"#);

    let saved = &report.hits[0].resolution;
    assert!(saved.buddha_saved);
    assert_eq!(saved.health_after, Some(1));
    assert!(report.hits[1].resolution.is_lethal(), "telefrags get through buddha");
}
