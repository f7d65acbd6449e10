//! HealthReserve - Carried health items used automatically on lethal hits

use super::InventoryItem;

/// A stack of identical carried health items
#[derive(Debug, Clone)]
pub struct HealthReserve {
    pub count: u32,
    /// Health restored per item
    pub heal_amount: i32,
}

impl HealthReserve {
    pub fn new(count: u32, heal_amount: i32) -> Self {
        HealthReserve { count, heal_amount }
    }
}

impl InventoryItem for HealthReserve {
    fn name(&self) -> &str {
        "HealthReserve"
    }

    fn auto_use_health(&mut self, needed: i32) -> i32 {
        let mut restored = 0;
        while restored < needed && self.count > 0 && self.heal_amount > 0 {
            self.count -= 1;
            restored += self.heal_amount;
        }
        restored
    }
}
