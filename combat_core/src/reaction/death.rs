//! Death - The one-way transition into a corpse

use super::DeathPresentation;
use crate::combat::{CombatContext, DeathReport};
use crate::combatant::{is_teammate, labels, ActiveState, ActorFlags, Cheats, Combatant, LifeState};
use crate::config::CombatConfig;
use crate::damage::Hit;
use crate::events::CombatEvent;
use crate::random::{RandomStream, RandomStreams};
use crate::threat::{record_death, KillInfo};
use crate::types::{DamageKind, EntityId};
use tracing::{debug, info};

/// Health above which a special fire inflictor still burns a player to death
const FLAME_DEATH_HEALTH: i32 = -50;
/// Damage above which a special fire inflictor still burns a player to death
const FLAME_DEATH_DAMAGE: i32 = 25;

/// Kill the target of a lethal hit
///
/// Records the killing blow, settles the death damage type and who gets
/// the credit, then runs the death transition.
pub(crate) fn kill(ctx: &mut CombatContext<'_>, hit: &Hit) -> DeathReport {
    let world = &*ctx.world;
    let inflictor = hit.inflictor.and_then(|id| world.get(id));
    let mut kind = hit.kind.clone();
    if let Some(death_type) = inflictor.map(|i| &i.class.death_type).filter(|d| !d.is_none()) {
        kind = death_type.clone();
    }
    let special_fire = inflictor.is_some_and(|i| i.flags.has_special_fire_damage());

    let credited = hit.source.map(|id| credit_master(world, id));

    if let Some(target) = ctx.world.get_mut(hit.target) {
        target.killing_blow = hit.damage;
        if kind.is(DamageKind::FIRE) {
            let burning_player = target.player.as_ref().is_some_and(|p| !p.is_morphed());
            if !burning_player
                || hit.inflictor.is_none()
                || (target.health > FLAME_DEATH_HEALTH && hit.damage > FLAME_DEATH_DAMAGE)
                || !special_fire
            {
                target.damage_type = kind;
            }
        } else {
            target.damage_type = kind;
        }
    }

    die(ctx, hit.target, credited, hit.inflictor)
}

/// Summoned monsters credit their player master
fn credit_master(world: &crate::world::World, source: EntityId) -> EntityId {
    world
        .get(source)
        .filter(|s| s.flags.is_summoned())
        .and_then(|s| s.tracer)
        .filter(|master| world.get(*master).is_some_and(Combatant::is_player))
        .unwrap_or(source)
}

/// Run the death transition for `victim`
pub(crate) fn die(
    ctx: &mut CombatContext<'_>,
    victim: EntityId,
    source: Option<EntityId>,
    inflictor: Option<EntityId>,
) -> DeathReport {
    let config = ctx.config;
    let Some(target) = ctx.world.get_mut(victim) else {
        return DeathReport::removed(victim, source);
    };

    target.inventory.owner_died();

    if target.flags.is_missile() {
        debug!(id = %victim, "missile explodes");
        ctx.events.emit(CombatEvent::MissileExploded { id: victim });
        return DeathReport {
            victim,
            credited: source,
            kind: target.damage_type.clone(),
            presentation: DeathPresentation::Exploded,
            state: None,
            kill: None,
        };
    }

    if source.is_some() {
        target.target = source;
    }
    become_corpse(target);

    if let Some(special) = target.special {
        if (!target.flags.is_pickup() || target.flags.is_monster()) && !target.flags.skips_death_special() {
            target.special = None;
            ctx.events.emit(CombatEvent::DeathSpecial {
                actor: victim,
                activator: source,
                special,
            });
        }
    }

    let kill_info = {
        let world = &*ctx.world;
        let victim_actor = world.get(victim);
        let source_actor = source.and_then(|id| world.get(id));
        KillInfo {
            victim,
            victim_slot: victim_actor.and_then(Combatant::player_slot),
            counts_as_kill: victim_actor.is_some_and(|v| v.flags.counts_as_kill()),
            source,
            source_slot: source_actor.and_then(Combatant::player_slot),
            teammates: match (victim_actor, source_actor) {
                (Some(v), Some(s)) => is_teammate(v, s, world, &config.rules),
                _ => false,
            },
        }
    };
    let kill = record_death(ctx.match_state, &config.constants, &config.rules, &kill_info, ctx.events);

    if let Some(slot) = kill_info.victim_slot {
        player_died(ctx, victim, slot, source, inflictor);
    }

    let inflictor_flags = inflictor
        .and_then(|id| ctx.world.get(id))
        .map(|i| i.flags)
        .unwrap_or_default();
    let Some(target) = ctx.world.get_mut(victim) else {
        return DeathReport::removed(victim, source);
    };
    let (presentation, state) = select_death_state(target, inflictor_flags, config, ctx.rng);
    if presentation == DeathPresentation::Removed {
        ctx.events.emit(CombatEvent::Destroyed { id: victim });
    }
    info!(victim = %victim, source = ?source, ?presentation, "killed");

    DeathReport {
        victim,
        credited: source,
        kind: target.damage_type.clone(),
        presentation,
        state,
        kill: Some(kill),
    }
}

/// Flag changes every corpse gets
fn become_corpse(target: &mut Combatant) {
    target.flags.remove(ActorFlags::SHOOTABLE | ActorFlags::FLOAT | ActorFlags::SKULL_FLY);
    if !target.flags.contains(ActorFlags::DONT_FALL) {
        target.flags.remove(ActorFlags::NO_GRAVITY);
    }
    target.flags.insert(ActorFlags::DROPOFF);

    let raisable = target.flags.is_monster()
        || target.find_state(&[labels::RAISE], true).is_some()
        || target.is_player();
    if raisable && !target.flags.refuses_corpse() {
        target.flags.insert(ActorFlags::CORPSE);
    }
    target.flags.insert(ActorFlags::KILLED);

    let class = &target.class;
    let meta_height = if target.damage_type.is(DamageKind::FIRE) {
        class.burn_height.filter(|h| *h != 0.0)
    } else {
        None
    }
    .or(class.death_height.filter(|h| *h != 0.0));
    target.height = match meta_height {
        Some(h) => h.max(0.0),
        None => target.height / 4.0,
    };
}

/// Player-only death bookkeeping
fn player_died(
    ctx: &mut CombatContext<'_>,
    victim: EntityId,
    slot: usize,
    source: Option<EntityId>,
    inflictor: Option<EntityId>,
) {
    let config = ctx.config;
    let rules = &config.rules;
    let respawn_time = ctx.match_state.level_time + config.constants.respawn_delay_tics;

    let kind = ctx.world.get(victim).map(|v| v.damage_type.clone()).unwrap_or_default();
    ctx.events.emit(CombatEvent::Obituary {
        victim,
        inflictor,
        source,
        kind,
    });

    if rules.bot_count > 0 {
        let delay = u32::from(ctx.rng.byte(RandomStream::BotRespawn) % 15)
            + (rules.bot_count - 1) * 2
            + config.constants.tic_rate
            + 1;
        for other in ctx.world.iter_mut() {
            let Some(bot) = other.player.as_mut().and_then(|p| p.bot.as_mut()) else {
                continue;
            };
            if other.id == victim {
                bot.respawn_tics = delay;
            } else if bot.enemy == Some(victim) {
                if bot.dest == bot.enemy {
                    bot.dest = None;
                }
                bot.enemy = None;
            }
        }
    }

    let score = ctx.match_state.score_mut(slot);
    score.spree_count = 0;
    score.multi_count = 0;

    if let Some(target) = ctx.world.get_mut(victim) {
        target.flags.remove(ActorFlags::SOLID);
        if let Some(pawn) = target.player.as_mut() {
            pawn.respawn_time = Some(respawn_time);
            pawn.life = LifeState::Dead;
        }
    }
    ctx.events.emit(CombatEvent::WeaponDropped { id: victim });
}

/// Pick and enter a death state
///
/// First match wins: typed extreme, typed, generic elemental, extreme,
/// plain death. With none of those the combatant is marked destroyed.
/// Entering a state shortens its duration by up to three ticks.
pub fn select_death_state(
    target: &mut Combatant,
    inflictor: ActorFlags,
    config: &CombatConfig,
    rng: &mut RandomStreams,
) -> (DeathPresentation, Option<ActiveState>) {
    let gib_health = target.gib_health;
    let mut extreme = (target.health < gib_health || inflictor.forces_extreme_death())
        && !inflictor.forbids_extreme_death();

    if target.damage_type.is(DamageKind::EXTREME) {
        extreme = true;
        target.damage_type = DamageKind::none();
    }

    let mut found: Option<(DeathPresentation, ActiveState)> = None;
    let kind = target.damage_type.clone();

    if !kind.is_none() {
        if extreme {
            found = target
                .find_state(&[labels::DEATH, labels::EXTREME, kind.as_str()], true)
                .map(|s| (DeathPresentation::TypedExtreme(kind.clone()), s));
        }
        if found.is_none() {
            found = target
                .find_state(&[labels::DEATH, kind.as_str()], true)
                .map(|s| (DeathPresentation::Typed(kind.clone()), s));
            if found.is_some() {
                extreme = false;
            }
        }
        if found.is_none() {
            if let Some(generic) = config.damage_types.generic_death(&kind) {
                let allowed = !config.rules.no_autofreeze
                    && !target.flags.refuses_ice_death()
                    && (target.is_player() || target.flags.is_monster());
                if allowed {
                    found = target
                        .find_state(&[generic], true)
                        .map(|s| (DeathPresentation::GenericElemental(s.label.clone()), s));
                    extreme = false;
                }
            }
        }
    }

    if found.is_none() {
        if !kind.is(DamageKind::MASSACRE) {
            target.damage_type = DamageKind::none();
        }
        if extreme {
            found = target
                .find_state(&[labels::DEATH, labels::EXTREME], true)
                .map(|s| (DeathPresentation::Extreme, s));
        }
        if found.is_none() {
            extreme = false;
            found = target
                .find_state(&[labels::DEATH], true)
                .map(|s| (DeathPresentation::Normal, s));
        }
    }

    if extreme {
        if let Some(pawn) = target.player.as_mut() {
            pawn.cheats |= Cheats::EXTREMELY_DEAD;
        } else if target.health >= gib_health {
            target.health = gib_health - 1;
        }
    }

    match found {
        Some((presentation, mut state)) => {
            if state.tics > 1 {
                state.tics = (state.tics - i32::from(rng.byte(RandomStream::DeathJitter) & 3)).max(1);
            }
            debug!(id = %target.id, state = %state.label, tics = state.tics, "death state");
            target.set_state(state.clone());
            (presentation, Some(state))
        }
        None => {
            debug!(id = %target.id, "no death state, removing");
            target.destroyed = true;
            (DeathPresentation::Removed, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::StateTable;
    use crate::config::CombatantClass;
    use std::sync::Arc;

    fn victim(states: StateTable, health: i32) -> Combatant {
        let mut class = CombatantClass::monster("Dummy", 100);
        class.gib_health = Some(-20);
        class.states = states;
        Combatant::spawn(EntityId(1), Arc::new(class)).with_health(health)
    }

    fn select(target: &mut Combatant, inflictor: ActorFlags) -> DeathPresentation {
        select_death_state(target, inflictor, &CombatConfig::default(), &mut RandomStreams::new(7)).0
    }

    fn fire_states() -> StateTable {
        StateTable::new()
            .with("Death", 8)
            .with("Death.Extreme", 6)
            .with("Death.Fire", 10)
            .with("Death.Extreme.Fire", 12)
    }

    #[test]
    fn test_typed_extreme_beats_typed() {
        let mut target = victim(fire_states(), -30);
        target.damage_type = DamageKind::new("fire");
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::TypedExtreme(DamageKind::new("fire")));

        let mut target = victim(fire_states(), -5);
        target.damage_type = DamageKind::new("fire");
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Typed(DamageKind::new("fire")));
    }

    #[test]
    fn test_gib_boundary_is_strict() {
        let mut target = victim(fire_states(), -20);
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Normal);

        let mut target = victim(fire_states(), -21);
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Extreme);
    }

    #[test]
    fn test_inflictor_extreme_flags() {
        let mut target = victim(fire_states(), -1);
        assert_eq!(select(&mut target, ActorFlags::EXTREME_DEATH), DeathPresentation::Extreme);
        // Forced below the gib threshold for corpse crushing
        assert_eq!(target.health, -21);

        let mut target = victim(fire_states(), -50);
        assert_eq!(select(&mut target, ActorFlags::NO_EXTREME_DEATH), DeathPresentation::Normal);
    }

    #[test]
    fn test_extreme_kind_forces_extreme() {
        let mut target = victim(fire_states(), -1);
        target.damage_type = DamageKind::new("Extreme");
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Extreme);
        assert!(target.damage_type.is_none());
    }

    #[test]
    fn test_generic_freeze_death() {
        let states = StateTable::new().with("Death", 8).with("GenericFreezeDeath", 5);
        let mut target = victim(states.clone(), -1);
        target.damage_type = DamageKind::new("ice");
        assert_eq!(
            select(&mut target, ActorFlags::empty()),
            DeathPresentation::GenericElemental("genericfreezedeath".to_string())
        );

        let mut target = victim(states, -1).with_flags(ActorFlags::NO_ICE_DEATH);
        target.damage_type = DamageKind::new("ice");
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Normal);
        assert!(target.damage_type.is_none());
    }

    #[test]
    fn test_massacre_kind_survives() {
        let mut target = victim(StateTable::new().with("Death", 8), -1);
        target.damage_type = DamageKind::new("massacre");
        select(&mut target, ActorFlags::empty());
        assert!(target.damage_type.is(DamageKind::MASSACRE));
    }

    #[test]
    fn test_no_death_state_removes() {
        let mut target = victim(StateTable::new().with("Spawn", 4), -1);
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Removed);
        assert!(target.destroyed);
    }

    #[test]
    fn test_jitter_keeps_at_least_one_tic() {
        for seed in 0..32 {
            let mut target = victim(StateTable::new().with("Death", 2), -1);
            let (_, state) =
                select_death_state(&mut target, ActorFlags::empty(), &CombatConfig::default(), &mut RandomStreams::new(seed));
            let tics = state.map(|s| s.tics).unwrap_or(0);
            assert!((1..=2).contains(&tics));
        }
    }

    #[test]
    fn test_player_extreme_sets_cheat() {
        let class = Arc::new(CombatantClass::player("Marine"));
        let mut target = Combatant::spawn(EntityId(1), class)
            .with_player(crate::combatant::PlayerPawn::new(0))
            .with_health(-150);
        assert_eq!(select(&mut target, ActorFlags::empty()), DeathPresentation::Extreme);
        assert!(target.player.as_ref().is_some_and(|p| p.cheats.contains(Cheats::EXTREMELY_DEAD)));
        assert_eq!(target.health, -150);
    }
}
