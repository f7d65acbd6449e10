//! Notifications raised for collaborators outside the combat core
//!
//! The core decides *that* something should be presented (an obituary, a
//! spree announcement, a level exit) and hands it to an [`EventSink`].
//! Text, sound and HUD are the sink's business.

use crate::threat::{MultikillTier, SpreeTier};
use crate::types::{DamageKind, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// A player reached a spree tier
    Spree {
        attacker: EntityId,
        victim: EntityId,
        tier: SpreeTier,
    },
    /// A player on a spree was killed by someone else
    SpreeEnded {
        attacker: EntityId,
        victim: EntityId,
        count: u32,
    },
    /// A player on a spree killed themselves
    SpreeKillSelf { victim: EntityId },
    Multikill {
        attacker: EntityId,
        victim: EntityId,
        tier: MultikillTier,
    },
    /// A player died
    Obituary {
        victim: EntityId,
        inflictor: Option<EntityId>,
        source: Option<EntityId>,
        kind: DamageKind,
    },
    /// Frag limit reached; the level should end
    ExitLevelRequested { player: EntityId },
    /// No death state existed; the entity was removed without a corpse
    Destroyed { id: EntityId },
    /// A missile was killed and explodes instead of dying
    MissileExploded { id: EntityId },
    /// A frozen corpse was hit and shatters
    Shattered { id: EntityId },
    /// The thing special of a dead actor should run
    DeathSpecial {
        actor: EntityId,
        activator: Option<EntityId>,
        special: i32,
    },
    Howl { id: EntityId },
    Electrocuted { id: EntityId },
    /// The source healed by draining the target
    Drained { id: EntityId, amount: i32 },
    /// A dead player drops its weapon
    WeaponDropped { id: EntityId },
}

/// Receiver of combat notifications
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CombatEvent) {}
}
