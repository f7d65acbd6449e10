//! Defense system - Inventory items that absorb, scale or restore damage
//!
//! Items are opaque capabilities to the pipeline. It only ever calls the
//! four hooks on [`InventoryItem`], in inventory order.

mod armour;
mod health;
mod power;

pub use armour::BasicArmor;
pub use health::HealthReserve;
pub use power::{DamagePower, PowerKind};

use crate::types::DamageKind;
use std::fmt;

/// An item carried by a combatant that takes part in damage resolution
pub trait InventoryItem: fmt::Debug + Send + Sync {
    /// Item name, for logging
    fn name(&self) -> &str;

    /// Absorb part of an incoming hit, returning the damage that gets through
    ///
    /// `ignores_armor` is set when the damage type bypasses armor.
    fn absorb_damage(&mut self, damage: i32, _kind: &DamageKind, _ignores_armor: bool) -> i32 {
        damage
    }

    /// Scale damage dealt (`passive == false`) or received (`passive == true`)
    fn modify_damage(&mut self, damage: i32, _kind: &DamageKind, _passive: bool) -> i32 {
        damage
    }

    /// Restore up to `needed` health, returning the amount restored
    fn auto_use_health(&mut self, _needed: i32) -> i32 {
        0
    }

    /// The owner just died
    fn owner_died(&mut self) {}

    /// Advance item timers by one tick. Returns false once the item is spent.
    fn tick(&mut self) -> bool {
        true
    }
}

/// Ordered list of items carried by a combatant
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Box<dyn InventoryItem>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl InventoryItem + 'static) {
        self.items.push(Box::new(item));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name()).collect()
    }

    /// Run the absorb chain. Each item sees what the previous one let through.
    pub fn absorb_damage(&mut self, damage: i32, kind: &DamageKind, ignores_armor: bool) -> i32 {
        let mut remaining = damage;
        for item in &mut self.items {
            if remaining <= 0 {
                break;
            }
            remaining = item.absorb_damage(remaining, kind, ignores_armor);
        }
        remaining
    }

    /// Run the modifier chain, active or passive
    pub fn modify_damage(&mut self, damage: i32, kind: &DamageKind, passive: bool) -> i32 {
        let mut current = damage;
        for item in &mut self.items {
            if current <= 0 {
                break;
            }
            current = item.modify_damage(current, kind, passive);
        }
        current
    }

    /// Use health items until `needed` is covered or none are left
    pub fn auto_use_health(&mut self, needed: i32) -> i32 {
        let mut restored = 0;
        for item in &mut self.items {
            if restored >= needed {
                break;
            }
            restored += item.auto_use_health(needed - restored);
        }
        restored
    }

    pub fn owner_died(&mut self) {
        for item in &mut self.items {
            item.owner_died();
        }
    }

    /// Tick every item and drop the spent ones
    pub fn tick(&mut self) {
        self.items.retain_mut(|item| item.tick());
    }
}
