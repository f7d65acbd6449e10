//! DamageEvent - A single hit presented to the pipeline

use crate::types::{DamageKind, EntityId};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-event modifiers
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DamageFlags: u32 {
        /// Skip every mitigation and special-damage check
        const FORCED            = 1 << 0;
        /// Armor does not absorb
        const NO_ARMOR          = 1 << 1;
        /// Protection powers do not reduce
        const NO_PROTECT        = 1 << 2;
        /// Damage factors are not applied
        const NO_FACTOR         = 1 << 3;
        /// No knockback
        const THRUSTLESS        = 1 << 4;
        /// Pierces invulnerability
        const FOIL_INVUL        = 1 << 5;
        /// Defeats buddha
        const FOIL_BUDDHA       = 1 << 6;
        /// Inflictor is a hitscan puff; thrust originates at the source
        const INFLICTOR_IS_PUFF = 1 << 7;
    }
}

impl Serialize for DamageFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for DamageFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

impl DamageFlags {
    pub fn is_forced(self) -> bool {
        self.contains(Self::FORCED)
    }
    pub fn skips_armor(self) -> bool {
        self.contains(Self::NO_ARMOR)
    }
    pub fn skips_protection(self) -> bool {
        self.contains(Self::NO_PROTECT)
    }
    pub fn skips_factors(self) -> bool {
        self.contains(Self::NO_FACTOR)
    }
    pub fn is_thrustless(self) -> bool {
        self.contains(Self::THRUSTLESS)
    }
    pub fn foils_invulnerability(self) -> bool {
        self.contains(Self::FOIL_INVUL)
    }
    pub fn foils_buddha(self) -> bool {
        self.contains(Self::FOIL_BUDDHA)
    }
    pub fn inflictor_is_puff(self) -> bool {
        self.contains(Self::INFLICTOR_IS_PUFF)
    }
}

/// A damage event
///
/// `inflictor` is what physically hit (a missile), `source` is who gets the
/// credit (whoever fired it). Either may be absent and they may be equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub target: EntityId,
    #[serde(default)]
    pub inflictor: Option<EntityId>,
    #[serde(default)]
    pub source: Option<EntityId>,
    /// Damage before modification. Negative values cancel the hit.
    pub amount: i32,
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub flags: DamageFlags,
}

impl DamageEvent {
    pub fn new(target: EntityId, amount: i32) -> Self {
        DamageEvent {
            target,
            inflictor: None,
            source: None,
            amount,
            kind: DamageKind::none(),
            flags: DamageFlags::empty(),
        }
    }

    pub fn from_inflictor(mut self, inflictor: EntityId) -> Self {
        self.inflictor = Some(inflictor);
        self
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Inflictor and source are the same actor (melee, hitscan)
    pub fn by(self, attacker: EntityId) -> Self {
        self.from_inflictor(attacker).from_source(attacker)
    }

    pub fn of_kind(mut self, kind: impl Into<DamageKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_flags(mut self, flags: DamageFlags) -> Self {
        self.flags |= flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let event = DamageEvent::new(EntityId(1), 20)
            .by(EntityId(2))
            .of_kind("Fire")
            .with_flags(DamageFlags::FORCED);
        assert_eq!(event.inflictor, Some(EntityId(2)));
        assert_eq!(event.source, Some(EntityId(2)));
        assert!(event.kind.is("fire"));
        assert!(event.flags.is_forced());
    }

    #[test]
    fn test_parse_event() {
        let toml = r#"
target = 4
source = 2
amount = 30
kind = "Electric"
flags = "NO_ARMOR | THRUSTLESS"
"#;
        let event: DamageEvent = toml::from_str(toml).unwrap();
        assert_eq!(event.target, EntityId(4));
        assert!(event.inflictor.is_none());
        assert!(event.flags.skips_armor());
        assert!(event.flags.is_thrustless());
    }
}
