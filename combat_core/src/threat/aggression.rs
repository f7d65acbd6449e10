//! Aggression - Who a hurt combatant turns on

use crate::combat::CombatContext;
use crate::combatant::{is_friend, labels, ActorFlags, Combatant};
use crate::config::MatchRules;
use crate::types::EntityId;
use crate::world::World;
use tracing::debug;

/// Whether `target` may drop its current focus and go after `attacker`
///
/// Never itself, never something it cannot hurt, never a friend. While the
/// target is locked on (threshold running) only quick retaliators switch.
/// The class hook has the final veto.
pub fn okay_to_switch_target(target: &Combatant, attacker: &Combatant, world: &World, rules: &MatchRules) -> bool {
    if attacker.id == target.id || !attacker.flags.can_be_damaged() {
        return false;
    }
    if is_friend(target, attacker, world, rules) {
        return false;
    }
    if target.threshold != 0 && !target.flags.retaliates_quickly() {
        return false;
    }
    match &target.hooks {
        Some(hooks) => hooks.okay_to_switch_target(target, attacker),
        None => true,
    }
}

/// Update targeting after a hit that did not kill
///
/// `just_hit` comes from a successful pain reaction and marks the target
/// to fight back on its next move.
pub(crate) fn provoke(ctx: &mut CombatContext<'_>, target_id: EntityId, source: Option<EntityId>, just_hit: bool) {
    let config = ctx.config;
    let rules = &config.rules;
    let base_threshold = config.constants.base_threshold;

    let switch = {
        let world = &*ctx.world;
        let Some(target) = world.get(target_id) else {
            return;
        };
        match source.and_then(|id| world.get(id)) {
            Some(attacker) if target.target != Some(attacker.id) => {
                if okay_to_switch_target(target, attacker, world, rules) {
                    let forget_last = match target.last_enemy.and_then(|id| world.get(id)) {
                        None => true,
                        Some(last) => (!last.is_player() && target.hate_tid == 0) || last.health <= 0,
                    };
                    Some(forget_last)
                } else {
                    None
                }
            }
            _ => None,
        }
    };

    let Some(target) = ctx.world.get_mut(target_id) else {
        return;
    };
    target.reaction_time = 0;

    if let Some(source) = source {
        if target.target == Some(source) {
            target.threshold = base_threshold;
            wake_up(target);
        } else if let Some(forget_last) = switch {
            if forget_last {
                target.last_enemy = target.target;
            }
            debug!(target = %target_id, attacker = %source, previous = ?target.target, "switching target");
            target.target = Some(source);
            target.threshold = base_threshold;
            wake_up(target);
        }
    }

    if just_hit {
        let current = target.target;
        let world = &*ctx.world;
        let retaliate = current == source
            || match current.and_then(|id| world.get(id)) {
                None => true,
                Some(focus) => world
                    .get(target_id)
                    .is_some_and(|t| !is_friend(t, focus, world, rules)),
            };
        if retaliate {
            if let Some(target) = ctx.world.get_mut(target_id) {
                target.flags |= ActorFlags::JUST_HIT;
            }
        }
    }
}

/// Leave the spawn state for the see state, if there is one
fn wake_up(target: &mut Combatant) {
    if target.in_spawn_state() {
        if let Some(see) = target.find_state(&[labels::SEE], true) {
            target.set_state(see);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CombatConfig, CombatantClass};
    use crate::simulation::Simulation;
    use std::sync::Arc;

    fn imp(id: u32) -> Combatant {
        Combatant::spawn(EntityId(id), Arc::new(CombatantClass::monster("Imp", 60)))
    }

    fn switchable(a: &Combatant, b: &Combatant) -> bool {
        okay_to_switch_target(a, b, &World::new(), &MatchRules::default())
    }

    /// Spawn an imp with its targeting already set up
    fn spawn_imp(sim: &mut Simulation, build: impl FnOnce(&mut Combatant)) -> EntityId {
        sim.spawn_with(Arc::new(CombatantClass::monster("Imp", 60)), |mut c| {
            build(&mut c);
            c
        })
    }

    fn marine() -> Arc<CombatantClass> {
        Arc::new(CombatantClass::player("Marine"))
    }

    #[test]
    fn test_never_switch_to_self() {
        let a = imp(1);
        assert!(!switchable(&a, &a));
    }

    #[test]
    fn test_threshold_blocks_switch() {
        let mut a = imp(1);
        let b = imp(2);
        assert!(switchable(&a, &b));
        a.threshold = 10;
        assert!(!switchable(&a, &b));
        a.flags |= ActorFlags::QUICK_TO_RETALIATE;
        assert!(switchable(&a, &b));
    }

    #[test]
    fn test_friends_are_not_targets() {
        let a = imp(1).with_flags(ActorFlags::FRIENDLY);
        let b = imp(2).with_flags(ActorFlags::FRIENDLY);
        assert!(!switchable(&a, &b));
    }

    #[derive(Debug)]
    struct Loyal;

    impl crate::combatant::CombatHooks for Loyal {
        fn okay_to_switch_target(&self, _target: &Combatant, _attacker: &Combatant) -> bool {
            false
        }
    }

    #[test]
    fn test_hook_vetoes_switch() {
        let a = imp(1).with_hooks(Arc::new(Loyal));
        let b = imp(2);
        assert!(!switchable(&a, &b));
    }

    #[test]
    fn test_provoke_switches_and_remembers_old_target() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let old = spawn_imp(&mut sim, |_| {});
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| c.target = Some(old));

        provoke(&mut sim.context(), id, Some(attacker), false);

        let imp = sim.world().get(id).unwrap();
        assert_eq!(imp.target, Some(attacker));
        assert_eq!(imp.last_enemy, Some(old));
        assert_eq!(imp.threshold, 100);
        assert!(imp.state.as_ref().is_some_and(|s| s.is(labels::SEE)));
        assert!(!imp.flags.contains(ActorFlags::JUST_HIT));
    }

    #[test]
    fn test_provoke_keeps_living_player_as_last_enemy() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let player = sim.spawn_player(marine(), crate::combatant::PlayerPawn::new(0));
        let old = spawn_imp(&mut sim, |_| {});
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| {
            c.target = Some(old);
            c.last_enemy = Some(player);
        });

        provoke(&mut sim.context(), id, Some(attacker), false);

        let imp = sim.world().get(id).unwrap();
        assert_eq!(imp.target, Some(attacker));
        assert_eq!(imp.last_enemy, Some(player));
    }

    #[test]
    fn test_provoke_replaces_dead_last_enemy() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let fallen = sim.spawn_with(marine(), |c| c.with_player(crate::combatant::PlayerPawn::new(0)).with_health(0));
        let old = spawn_imp(&mut sim, |_| {});
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| {
            c.target = Some(old);
            c.last_enemy = Some(fallen);
        });

        provoke(&mut sim.context(), id, Some(attacker), false);
        assert_eq!(sim.world().get(id).unwrap().last_enemy, Some(old));
    }

    #[test]
    fn test_provoke_same_attacker_resets_threshold() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| {
            c.target = Some(attacker);
            c.threshold = 3;
        });

        provoke(&mut sim.context(), id, Some(attacker), true);

        let imp = sim.world().get(id).unwrap();
        assert_eq!(imp.target, Some(attacker));
        assert_eq!(imp.threshold, 100);
        assert!(imp.flags.contains(ActorFlags::JUST_HIT));
    }

    #[test]
    fn test_provoke_locked_on_keeps_target() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let old = spawn_imp(&mut sim, |_| {});
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| {
            c.target = Some(old);
            c.threshold = 20;
        });

        provoke(&mut sim.context(), id, Some(attacker), true);

        let imp = sim.world().get(id).unwrap();
        assert_eq!(imp.target, Some(old));
        assert_eq!(imp.last_enemy, None);
        assert!(imp.flags.contains(ActorFlags::JUST_HIT));
    }

    #[test]
    fn test_no_retaliation_while_focused_on_a_friend() {
        let mut sim = Simulation::new(CombatConfig::default(), 1);
        let buddy = spawn_imp(&mut sim, |c| c.flags |= ActorFlags::FRIENDLY);
        let attacker = spawn_imp(&mut sim, |_| {});
        let id = spawn_imp(&mut sim, |c| {
            c.flags |= ActorFlags::FRIENDLY;
            c.target = Some(buddy);
            c.threshold = 20;
        });

        provoke(&mut sim.context(), id, Some(attacker), true);

        let imp = sim.world().get(id).unwrap();
        assert_eq!(imp.target, Some(buddy));
        assert!(!imp.flags.contains(ActorFlags::JUST_HIT));
    }
}
