//! Damage resolution - Run a DamageEvent through the whole pipeline

use super::result::{Outcome, Resolution};
use super::CombatContext;
use crate::damage::{deal_damage, mitigate, DamageEvent, Hit, Stage};
use crate::reaction::{check_wound, evaluate_pain, kill, Reaction};
use crate::threat::provoke;
use tracing::debug;

/// Resolve a damage event against the world
///
/// This is the only way combatant health goes down. Steps:
/// 1. Preconditions and invulnerability
/// 2. Skill, special-damage hooks, multipliers, protection, damage factors
/// 3. Knockback
/// 4. Friendly fire
/// 5. Armor and auto-use health
/// 6. Health decrement, buddha, drain
/// 7. Death, wound or pain, then aggression
///
/// Every exit either leaves health untouched or completes the reaction.
pub fn resolve_damage(ctx: &mut CombatContext<'_>, event: &DamageEvent) -> Resolution {
    let mut hit = Hit::new(event, ctx.config.constants.telefrag_damage);
    let health_before = ctx.world.health(event.target);

    let (damage, outcome) = match mitigate(ctx, &mut hit) {
        Stage::Rejected => return Resolution::rejected(event.target, health_before),
        Stage::Absorbed(damage) => (damage, Outcome::Absorbed),
        Stage::ForcedPain => (0, Outcome::ZeroDamagePain(react(ctx, &hit, true))),
        Stage::FakedPain => (0, Outcome::ZeroDamagePain(react(ctx, &hit, false))),
        Stage::Apply(_) => {
            deal_damage(ctx, &mut hit);
            (hit.damage, after_damage(ctx, &mut hit))
        }
    };

    let resolution = Resolution {
        target: event.target,
        damage,
        outcome,
        health_before,
        health_after: ctx.world.health(event.target),
        thrust: hit.thrust,
        buddha_saved: hit.buddha_saved,
    };
    debug!(summary = %resolution.summary(), "damage resolved");
    resolution
}

/// Consequences of a hit that lowered health
fn after_damage(ctx: &mut CombatContext<'_>, hit: &mut Hit) -> Outcome {
    let inflictor_foils = hit
        .inflictor
        .and_then(|id| ctx.world.get(id))
        .is_some_and(|i| i.flags.foils_buddha());
    let Some(target) = ctx.world.get_mut(hit.target) else {
        return Outcome::Absorbed;
    };

    if target.health <= 0 {
        let buddha = !hit.is_forced()
            && target.flags.is_buddha()
            && !hit.telefrag
            && !inflictor_foils
            && !hit.flags.foils_buddha();
        if !buddha {
            return Outcome::Lethal(Box::new(kill(ctx, hit)));
        }
        target.health = 1;
        hit.buddha_saved = true;
    }

    if check_wound(ctx, hit) {
        return Outcome::NonLethal(Reaction::Wound);
    }
    Outcome::NonLethal(react(ctx, hit, false))
}

/// Pain evaluation followed by the aggression update
fn react(ctx: &mut CombatContext<'_>, hit: &Hit, guaranteed: bool) -> Reaction {
    let (reaction, just_hit) = evaluate_pain(ctx, hit, guaranteed);
    provoke(ctx, hit.target, hit.source, just_hit);
    reaction
}
