//! Modifier pipeline - Turns a raw hit into the damage actually applied
//!
//! Stages run in a fixed order and each one either hands a damage value to
//! the next or ends the hit with a [`Stage`] other than `Apply`. Health is
//! never touched before [`deal_damage`].

use super::{thrust, DamageEvent, DamageFlags};
use crate::combat::CombatContext;
use crate::combatant::{is_hostile, is_teammate, ActorFlags, Cheats, Combatant, LifeState};
use crate::events::CombatEvent;
use crate::types::{scale_damage, DamageKind, EntityId};
use crate::world::World;
use glam::DVec3;
use tracing::{debug, trace};

/// Where a stage left the hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    /// Keep going with this amount
    Apply(i32),
    /// Nothing happens, not even pain
    Rejected,
    /// Mitigation consumed the hit; the amount is reported back unchanged
    Absorbed(i32),
    /// Health untouched, pain is guaranteed
    ForcedPain,
    /// Health untouched, the regular pain roll runs
    FakedPain,
}

/// Working state of a single damage event
#[derive(Debug, Clone)]
pub(crate) struct Hit {
    pub target: EntityId,
    pub inflictor: Option<EntityId>,
    pub source: Option<EntityId>,
    /// Amount as presented, never modified
    pub raw: i32,
    pub damage: i32,
    pub kind: DamageKind,
    pub flags: DamageFlags,
    /// Raw amount reached the telefrag threshold
    pub telefrag: bool,
    pub forced_pain: bool,
    pub faked_pain: bool,
    /// Invulnerable player that still flinches but is not pushed
    pub no_thrust: bool,
    /// Pain reaction on an invulnerable target
    pub invul_pain: bool,
    /// A buddha effect kept the target at 1 health
    pub buddha_saved: bool,
    /// Velocity added by this hit
    pub thrust: DVec3,
}

impl Hit {
    pub fn new(event: &DamageEvent, telefrag_damage: i32) -> Self {
        Hit {
            target: event.target,
            inflictor: event.inflictor,
            source: event.source,
            raw: event.amount,
            damage: event.amount.max(0),
            kind: event.kind.clone(),
            flags: event.flags,
            telefrag: event.amount >= telefrag_damage,
            forced_pain: false,
            faked_pain: false,
            no_thrust: false,
            invul_pain: false,
            buddha_saved: false,
            thrust: DVec3::ZERO,
        }
    }

    pub fn is_forced(&self) -> bool {
        self.flags.is_forced()
    }

    /// Mitigation may reduce this hit
    pub fn reducible(&self, target: &Combatant) -> bool {
        !self.telefrag || target.flags.is_lax_telefrag()
    }

    pub fn inflictor_flags(&self, world: &World) -> ActorFlags {
        self.inflictor
            .and_then(|id| world.get(id))
            .map(|c| c.flags)
            .unwrap_or_default()
    }
}

/// Target flinches even though the hit is nullified
fn is_fake_pain(target: ActorFlags, inflictor: ActorFlags, damage: i32) -> bool {
    (target.allows_pain() && damage > 0) || inflictor.causes_pain()
}

/// Inflictor guarantees a pain reaction
fn must_force_pain(target: ActorFlags, inflictor: ActorFlags) -> bool {
    !target.feels_no_pain() && inflictor.forces_pain() && !inflictor.is_painless()
}

/// A hit that mitigation brought down to zero
fn zero_damage(hit: &mut Hit) -> Stage {
    hit.damage = 0;
    if hit.forced_pain {
        Stage::ForcedPain
    } else if hit.faked_pain {
        Stage::FakedPain
    } else {
        Stage::Rejected
    }
}

/// Run every stage up to (not including) the health decrement
pub(crate) fn mitigate(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    let stage = preconditions(ctx, hit);
    if stage != Stage::Apply(hit.damage) {
        return stage;
    }

    if !hit.is_forced() {
        match modifiers(ctx, hit) {
            Stage::Apply(damage) => hit.damage = damage,
            other => return other,
        }
    }
    if hit.damage < 0 {
        debug!(target = %hit.target, damage = hit.damage, "negative damage, hit rejected");
        return Stage::Rejected;
    }

    thrust::apply(ctx, hit);

    match team_damage(ctx, hit) {
        Stage::Apply(damage) => hit.damage = damage,
        other => return other,
    }

    let is_player = ctx.world.get(hit.target).is_some_and(Combatant::is_player);
    let stage = if is_player {
        player_protection(ctx, hit)
    } else {
        monster_armor(ctx, hit)
    };
    if let Stage::Apply(damage) = stage {
        hit.damage = damage;
    }
    stage
}

/// Early outs that need no damage math
fn preconditions(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    if hit.raw < 0 {
        debug!(target = %hit.target, raw = hit.raw, "negative raw damage cancels the hit");
        return Stage::Rejected;
    }
    let inflictor_flags = hit.inflictor_flags(ctx.world);
    let Some(target) = ctx.world.get(hit.target) else {
        debug!(target = %hit.target, "target does not exist");
        return Stage::Rejected;
    };
    if !target.flags.can_be_damaged() {
        trace!(target = %hit.target, "target is not shootable");
        return Stage::Rejected;
    }

    hit.faked_pain = is_fake_pain(target.flags, inflictor_flags, hit.damage);
    hit.forced_pain = must_force_pain(target.flags, inflictor_flags);

    if target.flags.is_spectral()
        && !hit.telefrag
        && (hit.inflictor.is_none() || !inflictor_flags.is_spectral())
    {
        trace!(target = %hit.target, "spectral target ignores non-spectral hit");
        return Stage::Rejected;
    }

    if target.health <= 0 {
        let unshatterable_ice =
            hit.inflictor.is_some() && hit.kind.is(DamageKind::ICE) && !inflictor_flags.shatters_ice();
        if !unshatterable_ice && target.flags.is_ice_corpse() {
            if let Some(corpse) = ctx.world.get_mut(hit.target) {
                if let Some(state) = corpse.state.as_mut() {
                    state.tics = 1;
                }
                corpse.flags |= ActorFlags::SHATTERING;
                corpse.velocity = DVec3::ZERO;
            }
            debug!(target = %hit.target, "frozen corpse shatters");
            ctx.events.emit(CombatEvent::Shattered { id: hit.target });
        }
        return Stage::Rejected;
    }

    if target.flags.is_invulnerable() && !hit.telefrag && !hit.is_forced() {
        if let Some(pawn) = &target.player {
            if pawn.no_thrust_when_invul {
                if hit.faked_pain {
                    hit.no_thrust = true;
                } else {
                    return Stage::Rejected;
                }
            }
        } else if !inflictor_flags.foils_invulnerability() && !hit.flags.foils_invulnerability() {
            if hit.faked_pain {
                debug!(target = %hit.target, "invulnerable target flinches");
                hit.damage = 0;
                hit.invul_pain = true;
                return Stage::FakedPain;
            }
            trace!(target = %hit.target, "invulnerable target ignores hit");
            return Stage::Rejected;
        }
    }

    if inflictor_flags.pierces_armor() {
        hit.flags |= DamageFlags::NO_ARMOR;
    }

    if let Some(target) = ctx.world.get_mut(hit.target) {
        if target.flags.is_skull_flying() {
            target.velocity = DVec3::ZERO;
        }
    }

    Stage::Apply(hit.damage)
}

/// Skill, special-damage hooks, multipliers, protection and damage factors
fn modifiers(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    let rules = &ctx.config.rules;
    let mut damage = hit.damage;

    {
        let world = &*ctx.world;
        let Some(target) = world.get(hit.target) else {
            return Stage::Rejected;
        };
        if target.flags.is_dormant() {
            trace!(target = %hit.target, "dormant target ignores hit");
            return Stage::Rejected;
        }
        if !hit.reducible(target) {
            if target.flags.takes_no_damage() {
                damage = 0;
            }
            return Stage::Apply(damage);
        }

        if target.is_player() && damage > 1 {
            damage = scale_damage(damage, rules.skill.damage_factor);
        }

        if let Some(inflictor) = hit.inflictor.and_then(|id| world.get(id)) {
            if inflictor.flags.is_spectral() {
                if target.is_player() {
                    if !rules.deathmatch && inflictor.friend_player > 0 {
                        return Stage::Rejected;
                    }
                } else if target.flags.is_spectral()
                    && inflictor.friend_player == 0
                    && !is_hostile(target, inflictor, rules)
                {
                    return Stage::Rejected;
                }
            }

            damage = do_special_damage(inflictor, target, damage, &hit.kind);
            if damage < 0 {
                debug!(target = %hit.target, inflictor = %inflictor.id, "inflictor vetoed the hit");
                return Stage::Rejected;
            }
        }
    }

    let before_factors = damage;

    if damage > 0 {
        if let Some(source) = hit.source.and_then(|id| ctx.world.get_mut(id)) {
            damage = scale_damage(damage, source.damage_multiply);
            if damage > 0 && !source.inventory.is_empty() {
                damage = source.inventory.modify_damage(damage, &hit.kind, false);
            }
        }
    }

    let Some(target) = ctx.world.get_mut(hit.target) else {
        return Stage::Rejected;
    };
    if damage > 0 && !target.inventory.is_empty() && !hit.flags.skips_protection() {
        damage = target.inventory.modify_damage(damage, &hit.kind, true);
    }
    if damage > 0 && !hit.flags.skips_factors() {
        damage = scale_damage(damage, target.damage_factor);
        if damage > 0 {
            damage = ctx
                .config
                .damage_types
                .apply_factor(damage, &hit.kind, &target.class.damage_factors);
        }
    }
    trace!(target = %hit.target, before_factors, after = damage, "damage modifiers applied");

    if damage >= 0 {
        let world = &*ctx.world;
        if let Some(target) = world.get(hit.target) {
            let inflictor = hit.inflictor.and_then(|id| world.get(id));
            let source = hit.source.and_then(|id| world.get(id));
            damage = take_special_damage(ctx.config, target, inflictor, source, damage, &hit.kind);
        }
    }

    if damage == 0 && before_factors > 0 {
        debug!(target = %hit.target, "modifiers nullified the hit");
        return zero_damage(hit);
    }

    if ctx.world.get(hit.target).is_some_and(|t| t.flags.takes_no_damage()) {
        damage = 0;
    }
    Stage::Apply(damage)
}

/// Built-in inflictor check followed by the class hook
fn do_special_damage(inflictor: &Combatant, target: &Combatant, damage: i32, kind: &DamageKind) -> i32 {
    if let Some(pawn) = &target.player {
        if damage < 1000 && pawn.cheats.contains(Cheats::GODMODE) {
            return -1;
        }
    }
    match &inflictor.hooks {
        Some(hooks) => hooks.do_special_damage(inflictor, target, damage, kind),
        None => damage,
    }
}

/// Built-in death-state availability check followed by the class hook
///
/// A hit of a type the target has no way of dying from is refused, but only
/// when the target defines typed death states at all and the kind is not
/// `massacre`.
fn take_special_damage(
    config: &crate::config::CombatConfig,
    target: &Combatant,
    inflictor: Option<&Combatant>,
    source: Option<&Combatant>,
    damage: i32,
    kind: &DamageKind,
) -> i32 {
    let states = &target.class.states;
    let dies_anyway = states.find(&["Death"], true).is_some()
        || !states.has_special_death_states()
        || kind.is(DamageKind::MASSACRE);

    if !dies_anyway {
        let has_death = if kind.is(DamageKind::ICE) {
            let generic_allowed = !config.rules.no_autofreeze
                && !target.flags.refuses_ice_death()
                && (target.is_player() || target.flags.is_monster());
            states.find(&["Death", kind.as_str()], true).is_some()
                || (generic_allowed
                    && config
                        .damage_types
                        .generic_death(kind)
                        .is_some_and(|label| states.find(&[label], true).is_some()))
        } else {
            states.find(&["Death", kind.as_str()], false).is_some()
        };
        if !has_death {
            trace!(target = %target.id, kind = %kind, "no death state for damage type");
            return -1;
        }
    }

    match &target.hooks {
        Some(hooks) => hooks.take_special_damage(target, inflictor, source, damage, kind),
        None => damage,
    }
}

/// Friendly fire between teammates
fn team_damage(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    if hit.is_forced() {
        return Stage::Apply(hit.damage);
    }
    let world = &*ctx.world;
    let (Some(target), Some(source)) = (
        world.get(hit.target),
        hit.source.and_then(|id| world.get(id)),
    ) else {
        return Stage::Apply(hit.damage);
    };

    let same_actor = match (target.player_slot(), source.player_slot()) {
        (Some(a), Some(b)) => a == b,
        (Some(_), None) => false,
        _ => target.id == source.id,
    };
    if same_actor || !is_teammate(target, source, world, &ctx.config.rules) || !hit.reducible(target) {
        return Stage::Apply(hit.damage);
    }

    let damage = (hit.damage as f64 * ctx.config.rules.team_damage) as i32;
    debug!(target = %hit.target, source = %source.id, before = hit.damage, after = damage, "team damage scaled");
    match damage {
        d if d < 0 => Stage::Absorbed(d),
        0 => zero_damage(hit),
        d => Stage::Apply(d),
    }
}

/// Exit-sector hack, god mode, armor and auto-use health for players
fn player_protection(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    let inflictor_flags = hit.inflictor_flags(ctx.world);
    let rules = &ctx.config.rules;
    let ignores_armor = ctx.config.damage_types.ignores_armor(&hit.kind);
    let reducible = ctx.world.get(hit.target).is_some_and(|t| hit.reducible(t));
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return Stage::Rejected;
    };
    let Some(pawn) = target.player.as_mut() else {
        return Stage::Apply(hit.damage);
    };

    let mut damage = hit.damage;
    if let Some(bot) = pawn.bot.as_mut() {
        bot.allround = true;
    }
    if pawn.in_exit_sector && damage >= target.health {
        damage = target.health - 1;
    }

    if hit.is_forced() {
        return Stage::Apply(damage);
    }

    let cheats = pawn.cheats;
    let invulnerable = (!hit.telefrag
        && (target.flags.is_invulnerable() || cheats.contains(Cheats::GODMODE)))
        || cheats.contains(Cheats::GODMODE2)
        || target.flags.takes_no_damage();
    if invulnerable {
        if cheats.has_god() || target.flags.feels_no_pain() {
            trace!(target = %hit.target, "god mode ignores hit");
            return Stage::Rejected;
        }
        if target.flags.allows_pain() || target.flags.takes_no_damage() || inflictor_flags.causes_pain() {
            hit.invul_pain = true;
            return Stage::FakedPain;
        }
        return Stage::Rejected;
    }

    if !hit.flags.skips_armor() && !target.inventory.is_empty() {
        let absorbed = if damage > 0 {
            target.inventory.absorb_damage(damage, &hit.kind, ignores_armor)
        } else {
            damage
        };
        if reducible {
            damage = absorbed;
        }
        if damage <= 0 {
            let painful = !target.flags.feels_no_pain()
                && inflictor_flags.forces_pain()
                && !inflictor_flags.is_painless()
                && !target.flags.is_invulnerable()
                && !cheats.has_god();
            debug!(target = %hit.target, "armor absorbed the hit");
            hit.damage = damage;
            return if painful { Stage::ForcedPain } else { Stage::Absorbed(damage) };
        }
    }

    let morphed = target.player.as_ref().is_some_and(|p| p.is_morphed());
    if damage >= target.health
        && !hit.telefrag
        && (rules.skill.auto_use_health || rules.deathmatch)
        && !morphed
    {
        let needed = damage.saturating_sub(target.health).saturating_add(1);
        let healed = target.inventory.auto_use_health(needed);
        if healed > 0 {
            let cap = target.max_health().max(target.health);
            target.health = target.health.saturating_add(healed).min(cap);
            debug!(target = %hit.target, healed, "health items used to survive");
        }
    }

    Stage::Apply(damage)
}

/// Armor carried by non-player combatants
fn monster_armor(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Stage {
    if hit.flags.intersects(DamageFlags::NO_ARMOR | DamageFlags::FORCED) || hit.damage <= 0 {
        return Stage::Apply(hit.damage);
    }
    let ignores_armor = ctx.config.damage_types.ignores_armor(&hit.kind);
    let reducible = ctx.world.get(hit.target).is_some_and(|t| hit.reducible(t));
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return Stage::Rejected;
    };
    if target.inventory.is_empty() {
        return Stage::Apply(hit.damage);
    }

    let absorbed = target.inventory.absorb_damage(hit.damage, &hit.kind, ignores_armor);
    let damage = if reducible { absorbed } else { hit.damage };
    if damage <= 0 {
        debug!(target = %hit.target, "armor absorbed the hit");
        hit.damage = damage;
        return if hit.faked_pain { Stage::FakedPain } else { Stage::Absorbed(damage) };
    }
    Stage::Apply(damage)
}

/// The one place health goes down
///
/// Also handles player buddha, the player damage counter and drain.
pub(crate) fn deal_damage(ctx: &mut CombatContext<'_>, hit: &mut Hit) {
    let constants = &ctx.config.constants;
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return;
    };

    target.health = target.health.saturating_sub(hit.damage);
    if let Some(pawn) = target.player.as_mut() {
        if target.health <= 0 && !hit.is_forced() && pawn.life != LifeState::Dead {
            let buddha = pawn.cheats.contains(Cheats::BUDDHA2)
                || ((pawn.cheats.contains(Cheats::BUDDHA) || target.flags.is_buddha()) && !hit.telefrag);
            if buddha {
                target.health = 1;
                hit.buddha_saved = true;
            }
        }
        pawn.last_damage_type = hit.kind.clone();
        pawn.attacker = hit.source;
        pawn.damage_count = pawn.damage_count.saturating_add(hit.damage).min(constants.max_damage_count);
    }
    target.damage_type_received = hit.kind.clone();
    debug!(target = %hit.target, damage = hit.damage, health = target.health, "damage dealt");

    drain(ctx, hit);
}

/// A draining source heals by half the damage dealt
fn drain(ctx: &mut CombatContext<'_>, hit: &Hit) {
    let Some(source_id) = hit.source else {
        return;
    };
    let world = &*ctx.world;
    let (Some(target), Some(source)) = (world.get(hit.target), world.get(source_id)) else {
        return;
    };
    let Some(source_slot) = source
        .player
        .as_ref()
        .filter(|p| p.cheats.contains(Cheats::DRAIN))
        .map(|p| p.slot)
    else {
        return;
    };
    if target.flags.refuses_drain() || target.player_slot() == Some(source_slot) {
        return;
    }

    let Some(source) = ctx.world.get_mut(source_id) else {
        return;
    };
    let max = source.max_health();
    if source.health >= max {
        return;
    }
    let before = source.health;
    source.health = source.health.saturating_add(hit.damage / 2).min(max);
    let amount = source.health - before;
    if amount > 0 {
        ctx.events.emit(CombatEvent::Drained { id: source_id, amount });
    }
}
