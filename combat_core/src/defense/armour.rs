//! Armour - Absorbs a fixed share of each hit until depleted

use super::InventoryItem;
use crate::types::{scale_damage, DamageKind};

/// Armor that saves a percentage of each hit from its pool of points
#[derive(Debug, Clone)]
pub struct BasicArmor {
    /// Armor points left
    pub amount: i32,
    /// Share of each hit absorbed (0.0 - 1.0)
    pub save_percent: f64,
}

impl BasicArmor {
    pub fn new(amount: i32, save_percent: f64) -> Self {
        BasicArmor {
            amount,
            save_percent: save_percent.clamp(0.0, 1.0),
        }
    }

    /// Green armor: 100 points at 1/3
    pub fn green() -> Self {
        Self::new(100, 1.0 / 3.0)
    }

    /// Blue armor: 200 points at 1/2
    pub fn blue() -> Self {
        Self::new(200, 0.5)
    }

    pub fn is_depleted(&self) -> bool {
        self.amount <= 0
    }
}

/// Damage absorbed by armor for a hit of `damage`
///
/// Never more than the armor has left.
pub fn armor_saved(amount: i32, save_percent: f64, damage: i32) -> i32 {
    if damage <= 0 || amount <= 0 {
        return 0;
    }
    scale_damage(damage, save_percent).min(amount).max(0)
}

impl InventoryItem for BasicArmor {
    fn name(&self) -> &str {
        "BasicArmor"
    }

    fn absorb_damage(&mut self, damage: i32, _kind: &DamageKind, ignores_armor: bool) -> i32 {
        if ignores_armor {
            return damage;
        }
        let saved = armor_saved(self.amount, self.save_percent, damage);
        self.amount -= saved;
        damage - saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_armor() {
        assert_eq!(armor_saved(0, 0.5, 100), 0);
    }

    #[test]
    fn test_saved_capped_by_amount() {
        // 50% of 100 = 50, but only 20 points left
        assert_eq!(armor_saved(20, 0.5, 100), 20);
    }

    #[test]
    fn test_absorb_depletes() {
        let mut armor = BasicArmor::blue();
        let through = armor.absorb_damage(100, &DamageKind::none(), false);
        assert_eq!(through, 50);
        assert_eq!(armor.amount, 150);
    }

    #[test]
    fn test_fractional_save_floors() {
        let mut armor = BasicArmor::new(100, 0.25);
        // floor(30 * 0.25) = 7 saved
        let through = armor.absorb_damage(30, &DamageKind::none(), false);
        assert_eq!(through, 23);
        assert_eq!(armor.amount, 93);
    }

    #[test]
    fn test_ignored_types_pass() {
        let mut armor = BasicArmor::blue();
        assert_eq!(armor.absorb_damage(100, &DamageKind::new("drowning"), true), 100);
        assert_eq!(armor.amount, 200);
    }
}
