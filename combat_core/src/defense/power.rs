//! Timed powers that scale damage dealt or received

use super::InventoryItem;
use crate::types::{scale_damage, DamageKind};
use std::collections::HashMap;

/// Which side of a hit the power scales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerKind {
    /// Scales damage the owner deals
    Damage,
    /// Scales damage the owner receives
    Protection,
}

/// A damage or protection power with an optional per-type factor table
#[derive(Debug, Clone)]
pub struct DamagePower {
    pub kind: PowerKind,
    /// Factor used when the damage type has no entry
    pub factor: f64,
    pub type_factors: HashMap<DamageKind, f64>,
    /// Ticks left (-1 = permanent)
    pub tics_left: i32,
}

impl DamagePower {
    pub fn damage(factor: f64, tics: i32) -> Self {
        DamagePower {
            kind: PowerKind::Damage,
            factor,
            type_factors: HashMap::new(),
            tics_left: tics,
        }
    }

    pub fn protection(factor: f64, tics: i32) -> Self {
        DamagePower {
            kind: PowerKind::Protection,
            factor,
            type_factors: HashMap::new(),
            tics_left: tics,
        }
    }

    pub fn with_type_factor(mut self, kind: impl Into<DamageKind>, factor: f64) -> Self {
        self.type_factors.insert(kind.into(), factor);
        self
    }

    fn factor_for(&self, kind: &DamageKind) -> f64 {
        self.type_factors.get(kind).copied().unwrap_or(self.factor)
    }

    fn applies(&self, passive: bool) -> bool {
        match self.kind {
            PowerKind::Damage => !passive,
            PowerKind::Protection => passive,
        }
    }
}

impl InventoryItem for DamagePower {
    fn name(&self) -> &str {
        match self.kind {
            PowerKind::Damage => "PowerDamage",
            PowerKind::Protection => "PowerProtection",
        }
    }

    fn modify_damage(&mut self, damage: i32, kind: &DamageKind, passive: bool) -> i32 {
        if damage <= 0 || !self.applies(passive) {
            return damage;
        }
        scale_damage(damage, self.factor_for(kind))
    }

    fn tick(&mut self) -> bool {
        if self.tics_left < 0 {
            return true;
        }
        self.tics_left -= 1;
        self.tics_left > 0
    }
}
