//! Property tests for the damage pipeline
//!
//! Health only changes through a resolved hit, corpses stay corpses and the
//! gib boundary is strict.

use combat_core::combatant::StateTable;
use combat_core::config::CombatantClass;
use combat_core::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn monster(health: i32, gib_health: i32) -> CombatantClass {
    let mut class = CombatantClass::monster("Dummy", health);
    class.gib_health = Some(gib_health);
    class.pain_chance = 0;
    class.states = StateTable::new()
        .with("Spawn", 10)
        .with("See", 4)
        .with("Death", 5)
        .with("Death.Extreme", 5);
    class
}

proptest! {
    #[test]
    fn test_invulnerable_rejects_everything_below_telefrag(amount in 0i32..100_000, health in 1i32..500) {
        let mut sim = Simulation::new(CombatConfig::default(), 3);
        let id = sim.spawn_with(Arc::new(monster(health, -health)), |c| c.with_flags(ActorFlags::INVULNERABLE));

        let resolution = sim.damage(&DamageEvent::new(id, amount));
        prop_assert!(resolution.is_rejected());
        prop_assert_eq!(resolution.damage, -1);
        prop_assert_eq!(sim.world().health(id), Some(health));
    }

    #[test]
    fn test_negative_damage_never_heals(amount in i32::MIN..0, health in 1i32..500) {
        let mut sim = Simulation::new(CombatConfig::default(), 3);
        let id = sim.spawn(Arc::new(monster(health, -health)));

        let resolution = sim.damage(&DamageEvent::new(id, amount));
        prop_assert!(resolution.is_rejected());
        prop_assert_eq!(sim.world().health(id), Some(health));
    }

    #[test]
    fn test_dead_stays_dead(hits in proptest::collection::vec(1i32..200, 1..20)) {
        let mut sim = Simulation::new(CombatConfig::default(), 9);
        let id = sim.spawn(Arc::new(monster(50, -50)));

        let mut deaths = 0;
        let mut corpse_health = None;
        for amount in hits {
            let resolution = sim.damage(&DamageEvent::new(id, amount));
            if let Some(health) = corpse_health {
                prop_assert!(resolution.is_rejected());
                prop_assert_eq!(sim.world().health(id), Some(health));
            }
            if resolution.is_lethal() {
                deaths += 1;
                corpse_health = sim.world().health(id);
            }
        }
        prop_assert!(deaths <= 1);
        prop_assert_eq!(sim.match_state.killed_monsters, deaths);
    }

    #[test]
    fn test_gib_boundary(health in 1i32..200, amount in 1i32..600, gib in -100i32..-1) {
        let mut sim = Simulation::new(CombatConfig::default(), 5);
        let id = sim.spawn(Arc::new(monster(health, gib)));

        let resolution = sim.damage(&DamageEvent::new(id, amount));
        let remaining = health - amount;
        prop_assert_eq!(resolution.is_lethal(), remaining <= 0);
        if let Some(death) = resolution.death() {
            prop_assert_eq!(death.is_extreme(), remaining < gib);
            prop_assert_eq!(sim.world().health(id), Some(remaining));
        }
    }
}
