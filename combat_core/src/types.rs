//! Core types shared by every combat module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Damage at or above this value is a telefrag: it ignores most mitigation
pub const TELEFRAG_DAMAGE: i32 = 1_000_000;

/// Simulation ticks per second
pub const TICRATE: u32 = 35;

/// Identifier of a combatant inside a [`crate::world::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Player slot index
pub type PlayerSlot = usize;

/// Damage type identifier from an open, data-driven set
///
/// Names are case-insensitive and stored lowercase. `none` is the sentinel
/// for "no particular type".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DamageKind(String);

impl DamageKind {
    pub const NONE: &'static str = "none";
    pub const EXTREME: &'static str = "extreme";
    pub const ICE: &'static str = "ice";
    pub const FIRE: &'static str = "fire";
    pub const ELECTRIC: &'static str = "electric";
    pub const POISON_CLOUD: &'static str = "poisoncloud";
    pub const MASSACRE: &'static str = "massacre";
    pub const MDK: &'static str = "mdk";

    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Self::none();
        }
        DamageKind(name.to_ascii_lowercase())
    }

    pub fn none() -> Self {
        DamageKind(Self::NONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    pub fn is_none(&self) -> bool {
        self.is(Self::NONE)
    }
}

impl Default for DamageKind {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for DamageKind {
    fn from(s: &str) -> Self {
        DamageKind::new(s)
    }
}

impl From<String> for DamageKind {
    fn from(s: String) -> Self {
        DamageKind::new(s)
    }
}

impl From<DamageKind> for String {
    fn from(kind: DamageKind) -> Self {
        kind.0
    }
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scale damage by a factor, rounding toward negative infinity
pub fn scale_damage(damage: i32, factor: f64) -> i32 {
    (damage as f64 * factor).floor() as i32
}
