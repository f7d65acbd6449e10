//! Pain and wound interrupts

use super::Reaction;
use crate::combat::CombatContext;
use crate::combatant::labels;
use crate::damage::Hit;
use crate::events::CombatEvent;
use crate::random::RandomStream;
use crate::types::DamageKind;
use tracing::{debug, trace};

/// Enter the wound state if health dropped low enough
///
/// Returns true when the wound state was entered, which ends processing.
pub(crate) fn check_wound(ctx: &mut CombatContext<'_>, hit: &Hit) -> bool {
    let default_wound = ctx.config.constants.default_wound_health;
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return false;
    };
    let Some(wound) = target.find_state(&[labels::WOUND, hit.kind.as_str()], false) else {
        return false;
    };
    if target.health > target.wound_health(default_wound) {
        return false;
    }
    debug!(target = %hit.target, state = %wound.label, "wounded");
    target.set_state(wound);
    true
}

/// Roll for pain and enter the matching state
///
/// With `guaranteed` the eligibility checks and the roll are skipped. The
/// second value is the "just hit" marker used for retaliation.
pub(crate) fn evaluate_pain(ctx: &mut CombatContext<'_>, hit: &Hit, guaranteed: bool) -> (Reaction, bool) {
    let config = ctx.config;
    let constants = &config.constants;
    let skill = &config.rules.skill;
    let (inflictor_flags, inflictor_pain_type) = hit
        .inflictor
        .and_then(|id| ctx.world.get(id))
        .map(|i| (Some(i.flags), i.class.pain_type.clone()))
        .unwrap_or((None, DamageKind::none()));

    let Some(target) = ctx.world.get(hit.target) else {
        return (Reaction::Unmoved, false);
    };

    let triggered = guaranteed || {
        let eligible = !target.flags.feels_no_pain()
            && !inflictor_flags.is_some_and(|f| f.is_painless())
            && (target.is_player() || !skill.no_pain)
            && !target.flags.is_skull_flying();
        if eligible {
            let chance = target.class.pain_chance_for(&hit.kind, target.pain_chance);
            let threshold = target.pain_threshold;
            (hit.damage >= threshold && u16::from(ctx.rng.byte(RandomStream::Pain)) < chance)
                || inflictor_flags.is_some_and(|f| f.forces_pain())
        } else {
            false
        }
    };
    if !triggered {
        trace!(target = %hit.target, "no pain");
        return (Reaction::Unmoved, false);
    }

    let is_monster = target.flags.is_monster();
    if hit.kind.is(DamageKind::ELECTRIC) {
        if ctx.rng.byte(RandomStream::Lightning) < constants.electric_pain_odds {
            enter_pain_state(ctx, hit, &hit.kind);
            return (Reaction::Pain, true);
        }
        if let Some(target) = ctx.world.get_mut(hit.target) {
            target.full_bright = true;
        }
        debug!(target = %hit.target, "electrocuted");
        ctx.events.emit(CombatEvent::Electrocuted { id: hit.target });
        if is_monster && ctx.rng.byte(RandomStream::Lightning) < constants.howl_odds {
            ctx.events.emit(CombatEvent::Howl { id: hit.target });
        }
        return (Reaction::Electrocuted, false);
    }

    let pain_type = if inflictor_pain_type.is_none() {
        hit.kind.clone()
    } else {
        inflictor_pain_type
    };
    enter_pain_state(ctx, hit, &pain_type);
    if hit.kind.is(DamageKind::POISON_CLOUD) && is_monster && ctx.rng.byte(RandomStream::Poison) < constants.howl_odds {
        ctx.events.emit(CombatEvent::Howl { id: hit.target });
    }
    (Reaction::Pain, true)
}

fn enter_pain_state(ctx: &mut CombatContext<'_>, hit: &Hit, pain_type: &DamageKind) {
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return;
    };
    if let Some(pain) = target.find_state(&[labels::PAIN, pain_type.as_str()], false) {
        debug!(target = %hit.target, state = %pain.label, "pain");
        target.set_state(pain);
    }
}
