//! Player-controlled pawn data

use crate::types::{DamageKind, EntityId, PlayerSlot};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Player cheat and status bits
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Cheats: u32 {
        /// Invulnerable except to telefrags
        const GODMODE        = 1 << 0;
        /// Invulnerable to everything
        const GODMODE2       = 1 << 1;
        /// Cannot drop below 1 health except to telefrags
        const BUDDHA         = 1 << 2;
        /// Cannot drop below 1 health at all
        const BUDDHA2        = 1 << 3;
        /// Heal by half the damage dealt
        const DRAIN          = 1 << 4;
        /// Set when the player died an extreme death
        const EXTREMELY_DEAD = 1 << 5;
    }
}

impl Serialize for Cheats {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Cheats {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

impl Cheats {
    /// Either god mode variant
    pub fn has_god(self) -> bool {
        self.intersects(Cheats::GODMODE | Cheats::GODMODE2)
    }
}

/// Whether the player is alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// The weapon the player holds, as far as thrust is concerned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyWeapon {
    pub kickback: i32,
    /// Pushes with a fixed thrust and lift instead of damage-scaled thrust
    pub staff_kickback: bool,
}

impl ReadyWeapon {
    pub fn new(kickback: i32) -> Self {
        ReadyWeapon {
            kickback,
            staff_kickback: false,
        }
    }
}

/// Bot bookkeeping touched by deaths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotState {
    /// Ticks until the bot respawns after death
    pub respawn_tics: u32,
    pub enemy: Option<EntityId>,
    pub dest: Option<EntityId>,
    /// Look around for enemies after surviving an ambush
    pub allround: bool,
}

/// State carried by a player-controlled combatant
#[derive(Debug, Clone)]
pub struct PlayerPawn {
    pub slot: PlayerSlot,
    pub cheats: Cheats,
    pub life: LifeState,
    /// Accumulated damage for the screen flash, capped
    pub damage_count: i32,
    pub attacker: Option<EntityId>,
    pub last_damage_type: DamageKind,
    pub morph_tics: i32,
    /// Hits while invulnerable never push this player
    pub no_thrust_when_invul: bool,
    pub ready_weapon: Option<ReadyWeapon>,
    /// Level time at which respawning is allowed
    pub respawn_time: Option<u32>,
    pub bot: Option<BotState>,
    /// Standing in a sector that ends the level; lethal hits leave 1 health
    pub in_exit_sector: bool,
}

impl PlayerPawn {
    pub fn new(slot: PlayerSlot) -> Self {
        PlayerPawn {
            slot,
            cheats: Cheats::empty(),
            life: LifeState::Alive,
            damage_count: 0,
            attacker: None,
            last_damage_type: DamageKind::none(),
            morph_tics: 0,
            no_thrust_when_invul: false,
            ready_weapon: None,
            respawn_time: None,
            bot: None,
            in_exit_sector: false,
        }
    }

    pub fn with_cheats(mut self, cheats: Cheats) -> Self {
        self.cheats |= cheats;
        self
    }

    pub fn as_bot(mut self) -> Self {
        self.bot = Some(BotState::default());
        self
    }

    pub fn has_god_mode(&self) -> bool {
        self.cheats.has_god()
    }

    pub fn is_morphed(&self) -> bool {
        self.morph_tics > 0
    }

    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }
}
