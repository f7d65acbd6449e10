//! Reactions - Pain, wound and death state selection

mod death;
mod pain;

pub(crate) use death::kill;
pub use death::select_death_state;
pub(crate) use pain::{check_wound, evaluate_pain};

use crate::types::DamageKind;
use serde::{Deserialize, Serialize};

/// How a surviving combatant reacted to a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// No interrupt
    Unmoved,
    /// Entered (or would have entered) a pain state
    Pain,
    /// Electric damage lit the target up instead of a pain state
    Electrocuted,
    /// Low health wound state
    Wound,
}

/// Which death state a kill ended in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "presentation", content = "detail", rename_all = "snake_case")]
pub enum DeathPresentation {
    /// `Death.Extreme.<type>`
    TypedExtreme(DamageKind),
    /// `Death.<type>`
    Typed(DamageKind),
    /// Shared elemental death, e.g. `GenericFreezeDeath`
    GenericElemental(String),
    /// `Death.Extreme`
    Extreme,
    /// `Death`
    Normal,
    /// No death state; removed without a corpse
    Removed,
    /// Missiles explode instead of dying
    Exploded,
}

impl DeathPresentation {
    pub fn is_extreme(&self) -> bool {
        matches!(self, DeathPresentation::TypedExtreme(_) | DeathPresentation::Extreme)
    }
}
