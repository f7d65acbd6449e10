//! Resolution - Outcome of a single damage event

use crate::combatant::ActiveState;
use crate::reaction::{DeathPresentation, Reaction};
use crate::threat::KillReport;
use crate::types::{DamageKind, EntityId};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// How a damage event ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// No effect at all, not even pain
    Rejected,
    /// Armor or friendly-fire scaling consumed the hit without a reaction
    Absorbed,
    /// Health untouched but a pain evaluation ran
    ZeroDamagePain(Reaction),
    /// Health went down and the target survived
    NonLethal(Reaction),
    /// The target died
    Lethal(Box<DeathReport>),
}

/// Details of a kill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathReport {
    pub victim: EntityId,
    /// Who got the credit (a summoner's master, when there is one)
    pub credited: Option<EntityId>,
    /// Damage type recorded on the corpse
    pub kind: DamageKind,
    pub presentation: DeathPresentation,
    /// Death state entered, if any
    pub state: Option<ActiveState>,
    /// Scoring changes; absent for exploding missiles
    pub kill: Option<KillReport>,
}

impl DeathReport {
    pub(crate) fn removed(victim: EntityId, credited: Option<EntityId>) -> Self {
        DeathReport {
            victim,
            credited,
            kind: DamageKind::none(),
            presentation: DeathPresentation::Removed,
            state: None,
            kill: None,
        }
    }

    pub fn is_extreme(&self) -> bool {
        self.presentation.is_extreme()
    }
}

/// Result of resolving one damage event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub target: EntityId,
    /// Damage applied. -1 when rejected; may be negative when absorbed.
    pub damage: i32,
    pub outcome: Outcome,
    /// Target health before the hit (`None` if the target does not exist)
    pub health_before: Option<i32>,
    pub health_after: Option<i32>,
    /// Velocity added by knockback
    pub thrust: DVec3,
    /// A buddha effect kept the target alive at 1 health
    pub buddha_saved: bool,
}

impl Resolution {
    pub fn rejected(target: EntityId, health: Option<i32>) -> Self {
        Resolution {
            target,
            damage: -1,
            outcome: Outcome::Rejected,
            health_before: health,
            health_after: health,
            thrust: DVec3::ZERO,
            buddha_saved: false,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, Outcome::Rejected)
    }

    pub fn is_lethal(&self) -> bool {
        matches!(self.outcome, Outcome::Lethal(_))
    }

    pub fn death(&self) -> Option<&DeathReport> {
        match &self.outcome {
            Outcome::Lethal(report) => Some(report),
            _ => None,
        }
    }

    /// Reaction of a surviving target
    pub fn reaction(&self) -> Option<Reaction> {
        match self.outcome {
            Outcome::ZeroDamagePain(r) | Outcome::NonLethal(r) => Some(r),
            _ => None,
        }
    }

    /// Health lost (negative when healed by an absorbing item)
    pub fn health_change(&self) -> i32 {
        match (self.health_before, self.health_after) {
            (Some(before), Some(after)) => after.saturating_sub(before),
            _ => 0,
        }
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        match &self.outcome {
            Outcome::Rejected => return format!("{}: rejected", self.target),
            Outcome::Absorbed => parts.push("absorbed".to_string()),
            Outcome::ZeroDamagePain(reaction) => parts.push(format!("no damage, {:?}", reaction).to_lowercase()),
            Outcome::NonLethal(reaction) => {
                parts.push(format!("{} damage", self.damage));
                if *reaction != Reaction::Unmoved {
                    parts.push(format!("{:?}", reaction).to_lowercase());
                }
            }
            Outcome::Lethal(death) => {
                parts.push(format!("{} damage", self.damage));
                parts.push(format!("FATAL ({:?})", death.presentation));
            }
        }

        if self.buddha_saved {
            parts.push("saved by buddha".to_string());
        }
        if let Some(after) = self.health_after {
            parts.push(format!("health {}", after));
        }

        format!("{}: {}", self.target, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_summary() {
        let resolution = Resolution::rejected(EntityId(4), Some(50));
        assert!(resolution.is_rejected());
        assert_eq!(resolution.damage, -1);
        assert_eq!(resolution.health_change(), 0);
        assert_eq!(resolution.summary(), "#4: rejected");
    }

    #[test]
    fn test_nonlethal_summary() {
        let resolution = Resolution {
            target: EntityId(2),
            damage: 12,
            outcome: Outcome::NonLethal(Reaction::Pain),
            health_before: Some(60),
            health_after: Some(48),
            thrust: DVec3::ZERO,
            buddha_saved: false,
        };
        assert_eq!(resolution.summary(), "#2: 12 damage, pain, health 48");
        assert_eq!(resolution.health_change(), -12);
        assert_eq!(resolution.reaction(), Some(Reaction::Pain));
    }
}
