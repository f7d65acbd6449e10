//! Class-level behaviour overrides consulted during resolution

use super::Combatant;
use crate::types::DamageKind;
use std::fmt;

/// Hooks a class may install to veto or adjust damage
///
/// Every method has a pass-through default. A negative return from the
/// damage hooks cancels the hit entirely, pain included.
pub trait CombatHooks: fmt::Debug + Send + Sync {
    /// Called on the inflictor before any scaling
    fn do_special_damage(&self, _inflictor: &Combatant, _target: &Combatant, damage: i32, _kind: &DamageKind) -> i32 {
        damage
    }

    /// Called on the target after all factors have been applied
    fn take_special_damage(
        &self,
        _target: &Combatant,
        _inflictor: Option<&Combatant>,
        _source: Option<&Combatant>,
        damage: i32,
        _kind: &DamageKind,
    ) -> i32 {
        damage
    }

    /// Whether `target` may switch its attention to `attacker`
    fn okay_to_switch_target(&self, _target: &Combatant, _attacker: &Combatant) -> bool {
        true
    }
}
