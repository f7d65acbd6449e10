//! Capability flags and the named predicates the pipeline queries

use bitflags::bitflags;

bitflags! {
    /// Per-actor capability flags
    ///
    /// Deserializes from `"SHOOTABLE | COUNT_KILL"` style strings.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ActorFlags: u64 {
        const SHOOTABLE           = 1 << 0;
        const VULNERABLE          = 1 << 1;
        const SOLID               = 1 << 2;
        const SPECTRAL            = 1 << 3;
        const INVULNERABLE        = 1 << 4;
        const DORMANT             = 1 << 5;
        const NO_DAMAGE           = 1 << 6;
        const NO_PAIN             = 1 << 7;
        const LAX_TELEFRAG        = 1 << 8;
        const BUDDHA              = 1 << 9;
        const FOIL_INVUL          = 1 << 10;
        const FOIL_BUDDHA         = 1 << 11;
        const PIERCE_ARMOR        = 1 << 12;
        const ICE_SHATTER         = 1 << 13;
        const ICE_CORPSE          = 1 << 14;
        const SHATTERING          = 1 << 15;
        const NO_DMG_THRUST       = 1 << 16;
        const DONT_THRUST         = 1 << 17;
        const NO_CLIP             = 1 << 18;
        const NO_GRAVITY          = 1 << 19;
        const DONT_FALL           = 1 << 20;
        const NO_FORWARD_FALL     = 1 << 21;
        const SKULL_FLY           = 1 << 22;
        const FLOAT               = 1 << 23;
        const DROPOFF             = 1 << 24;
        const IS_MONSTER          = 1 << 25;
        const COUNT_KILL          = 1 << 26;
        const FRIENDLY            = 1 << 27;
        const EXTREME_DEATH       = 1 << 28;
        const NO_EXTREME_DEATH    = 1 << 29;
        const NO_ICE_DEATH        = 1 << 30;
        const DONT_CORPSE         = 1 << 31;
        const CORPSE              = 1 << 32;
        const KILLED              = 1 << 33;
        const SPECIAL_FIRE_DAMAGE = 1 << 34;
        const DONT_DRAIN          = 1 << 35;
        const SUMMONED_MONSTER    = 1 << 36;
        const MISSILE             = 1 << 37;
        const QUICK_TO_RETALIATE  = 1 << 38;
        const FORCE_PAIN          = 1 << 39;
        const CAUSE_PAIN          = 1 << 40;
        const ALLOW_PAIN          = 1 << 41;
        const PAINLESS            = 1 << 42;
        const JUST_HIT            = 1 << 43;
        const PICKUP              = 1 << 44;
        const FULL_BRIGHT         = 1 << 45;
        const NO_DEATH_SPECIAL    = 1 << 46;
    }
}

impl serde::Serialize for ActorFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for ActorFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

impl ActorFlags {
    /// Can be hit at all
    pub fn can_be_damaged(self) -> bool {
        self.intersects(Self::SHOOTABLE | Self::VULNERABLE)
    }
    pub fn is_spectral(self) -> bool {
        self.contains(Self::SPECTRAL)
    }
    pub fn is_invulnerable(self) -> bool {
        self.contains(Self::INVULNERABLE)
    }
    pub fn is_dormant(self) -> bool {
        self.contains(Self::DORMANT)
    }
    pub fn takes_no_damage(self) -> bool {
        self.contains(Self::NO_DAMAGE)
    }
    pub fn feels_no_pain(self) -> bool {
        self.contains(Self::NO_PAIN)
    }
    /// Telefrag damage may be reduced by mitigation
    pub fn is_lax_telefrag(self) -> bool {
        self.contains(Self::LAX_TELEFRAG)
    }
    pub fn is_buddha(self) -> bool {
        self.contains(Self::BUDDHA)
    }
    pub fn foils_invulnerability(self) -> bool {
        self.contains(Self::FOIL_INVUL)
    }
    pub fn foils_buddha(self) -> bool {
        self.contains(Self::FOIL_BUDDHA)
    }
    pub fn pierces_armor(self) -> bool {
        self.contains(Self::PIERCE_ARMOR)
    }
    pub fn shatters_ice(self) -> bool {
        self.contains(Self::ICE_SHATTER)
    }
    pub fn is_ice_corpse(self) -> bool {
        self.contains(Self::ICE_CORPSE)
    }
    pub fn suppresses_damage_thrust(self) -> bool {
        self.contains(Self::NO_DMG_THRUST)
    }
    pub fn refuses_thrust(self) -> bool {
        self.contains(Self::DONT_THRUST)
    }
    pub fn is_no_clip(self) -> bool {
        self.contains(Self::NO_CLIP)
    }
    pub fn ignores_gravity(self) -> bool {
        self.contains(Self::NO_GRAVITY)
    }
    pub fn prevents_forward_fall(self) -> bool {
        self.contains(Self::NO_FORWARD_FALL)
    }
    pub fn is_skull_flying(self) -> bool {
        self.contains(Self::SKULL_FLY)
    }
    pub fn is_monster(self) -> bool {
        self.contains(Self::IS_MONSTER)
    }
    pub fn is_friendly(self) -> bool {
        self.contains(Self::FRIENDLY)
    }
    /// Killing this actor increments the kill counters
    pub fn counts_as_kill(self) -> bool {
        self.contains(Self::COUNT_KILL) && !self.is_friendly()
    }
    pub fn forces_extreme_death(self) -> bool {
        self.contains(Self::EXTREME_DEATH)
    }
    pub fn forbids_extreme_death(self) -> bool {
        self.contains(Self::NO_EXTREME_DEATH)
    }
    pub fn refuses_ice_death(self) -> bool {
        self.contains(Self::NO_ICE_DEATH)
    }
    pub fn refuses_corpse(self) -> bool {
        self.contains(Self::DONT_CORPSE)
    }
    pub fn has_special_fire_damage(self) -> bool {
        self.contains(Self::SPECIAL_FIRE_DAMAGE)
    }
    pub fn refuses_drain(self) -> bool {
        self.contains(Self::DONT_DRAIN)
    }
    pub fn is_summoned(self) -> bool {
        self.contains(Self::SUMMONED_MONSTER)
    }
    pub fn is_missile(self) -> bool {
        self.contains(Self::MISSILE)
    }
    pub fn retaliates_quickly(self) -> bool {
        self.contains(Self::QUICK_TO_RETALIATE)
    }
    /// Inflictor always causes a pain reaction
    pub fn forces_pain(self) -> bool {
        self.contains(Self::FORCE_PAIN)
    }
    /// Inflictor causes pain even through invulnerability
    pub fn causes_pain(self) -> bool {
        self.contains(Self::CAUSE_PAIN)
    }
    /// Target flinches even when the hit is nullified
    pub fn allows_pain(self) -> bool {
        self.contains(Self::ALLOW_PAIN)
    }
    /// Inflictor never causes pain
    pub fn is_painless(self) -> bool {
        self.contains(Self::PAINLESS)
    }
    pub fn is_pickup(self) -> bool {
        self.contains(Self::PICKUP)
    }
    pub fn skips_death_special(self) -> bool {
        self.contains(Self::NO_DEATH_SPECIAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_monsters_do_not_count() {
        let flags = ActorFlags::COUNT_KILL | ActorFlags::FRIENDLY;
        assert!(!flags.counts_as_kill());
        assert!(ActorFlags::COUNT_KILL.counts_as_kill());
    }

    #[test]
    fn test_damageable_requires_either_flag() {
        assert!(ActorFlags::SHOOTABLE.can_be_damaged());
        assert!(ActorFlags::VULNERABLE.can_be_damaged());
        assert!(!ActorFlags::SOLID.can_be_damaged());
    }

    #[test]
    fn test_flags_deserialize_from_names() {
        #[derive(serde::Deserialize)]
        struct Holder {
            flags: ActorFlags,
        }

        let holder: Holder = toml::from_str(r#"flags = "SHOOTABLE | IS_MONSTER | COUNT_KILL""#).unwrap();
        assert!(holder.flags.can_be_damaged());
        assert!(holder.flags.is_monster());
        assert!(holder.flags.counts_as_kill());
    }
}
