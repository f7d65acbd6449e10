//! Knockback - Velocity impulse from a hit
//!
//! Thrust never changes the damage value and never rejects a hit.

use super::pipeline::Hit;
use crate::combat::CombatContext;
use crate::random::RandomStream;
use crate::types::DamageKind;
use glam::DVec3;
use std::f64::consts::{PI, TAU};
use tracing::trace;

/// Thrust below this is dropped
const MIN_THRUST: f64 = 0.01;
/// Hits below this damage may knock the victim forwards
const FORWARD_FALL_DAMAGE: i32 = 40;
/// Height above the origin required for a forward fall
const FORWARD_FALL_HEIGHT: f64 = 64.0;
/// Forward falls only happen below this thrust
const FORWARD_FALL_MAX_THRUST: f64 = 10.0;
const STAFF_THRUST: f64 = 10.0;
const STAFF_LIFT: f64 = 5.0;

/// Thrust magnitude for a hit
///
/// Scales with damage and kickback, inversely with mass, clamped to
/// `[0, cap]`. Massless targets always get the cap.
pub fn thrust_magnitude(damage: i32, kickback: i32, mass: f64, cap: f64) -> f64 {
    let thrust = if mass > 0.0 {
        (damage as f64 * 0.125 * kickback as f64 / mass).clamp(0.0, cap)
    } else {
        cap
    };
    if thrust < MIN_THRUST {
        0.0
    } else {
        thrust
    }
}

/// Push the target away from the hit origin
pub(crate) fn apply(ctx: &mut CombatContext<'_>, hit: &mut Hit) {
    if hit.no_thrust || hit.flags.is_thrustless() {
        return;
    }
    let Some(inflictor_id) = hit.inflictor.filter(|id| *id != hit.target) else {
        return;
    };

    let world = &*ctx.world;
    let constants = &ctx.config.constants;
    let (Some(target), Some(inflictor)) = (world.get(hit.target), world.get(inflictor_id)) else {
        return;
    };
    let source = hit.source.and_then(|id| world.get(id));

    if target.flags.is_no_clip()
        || inflictor.flags.suppresses_damage_thrust()
        || target.flags.refuses_thrust()
        || source.is_some_and(|s| s.is_player() && s.flags.suppresses_damage_thrust())
    {
        return;
    }

    let weapon = source.and_then(|s| s.player.as_ref()).and_then(|p| p.ready_weapon);
    let kickback = if inflictor.class.projectile_kickback != 0 {
        inflictor.class.projectile_kickback
    } else {
        weapon.map_or(constants.default_kickback, |w| w.kickback)
    };
    if kickback == 0 {
        return;
    }

    let origin = match source {
        Some(source) if hit.flags.inflictor_is_puff() => source,
        _ => inflictor,
    };
    let same_spot = origin.overlaps_xy(target);
    let origin_angle = origin.angle_to(target);
    let height_gap = target.position.z - origin.position.z;
    let cap = if hit.kind.is(DamageKind::MDK) {
        constants.mdk_max_thrust
    } else {
        constants.max_thrust
    };
    let mut thrust = thrust_magnitude(hit.damage, kickback, target.mass, cap);
    let target_health = target.health;
    let target_floats = target.flags.ignores_gravity();
    let no_forward_fall = inflictor.flags.prevents_forward_fall();
    let staff = source.is_some_and(|s| s.is_player())
        && hit.flags.inflictor_is_puff()
        && weapon.is_some_and(|w| w.staff_kickback);

    let mut angle = if same_spot {
        ctx.rng.next_u32(RandomStream::KickbackDirection) as f64 / (u32::MAX as f64 + 1.0) * TAU
    } else {
        origin_angle
    };

    if hit.damage < FORWARD_FALL_DAMAGE
        && hit.damage > target_health
        && height_gap > FORWARD_FALL_HEIGHT
        && ctx.rng.byte(RandomStream::ForwardFall) & 1 != 0
        && thrust < FORWARD_FALL_MAX_THRUST
        && !target_floats
        && !no_forward_fall
    {
        angle += PI;
        thrust *= 4.0;
    }

    let push = if staff {
        let lift = if target_floats { 0.0 } else { STAFF_LIFT };
        DVec3::new(STAFF_THRUST * angle.cos(), STAFF_THRUST * angle.sin(), lift)
    } else {
        DVec3::new(thrust * angle.cos(), thrust * angle.sin(), 0.0)
    };

    if let Some(target) = ctx.world.get_mut(hit.target) {
        target.velocity += push;
    }
    hit.thrust = push;
    trace!(target = %hit.target, thrust, angle, "knockback applied");
}
