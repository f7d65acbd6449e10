//! World - Owns every combatant, addressed by [`EntityId`]

use crate::combatant::{Combatant, PlayerPawn};
use crate::config::CombatantClass;
use crate::types::EntityId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Combatant storage with stable iteration order
#[derive(Debug, Default)]
pub struct World {
    combatants: BTreeMap<EntityId, Combatant>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        World {
            combatants: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> EntityId {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a combatant of `class`, letting `build` customise it
    pub fn spawn_with(
        &mut self,
        class: Arc<CombatantClass>,
        build: impl FnOnce(Combatant) -> Combatant,
    ) -> EntityId {
        let id = self.allocate();
        let combatant = build(Combatant::spawn(id, class));
        self.combatants.insert(id, combatant);
        id
    }

    pub fn spawn(&mut self, class: Arc<CombatantClass>) -> EntityId {
        self.spawn_with(class, |c| c)
    }

    pub fn spawn_player(&mut self, class: Arc<CombatantClass>, pawn: PlayerPawn) -> EntityId {
        self.spawn_with(class, |c| c.with_player(pawn))
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.combatants.contains_key(&id)
    }

    /// Remove combatants flagged as destroyed, returning their ids
    pub fn sweep_destroyed(&mut self) -> Vec<EntityId> {
        let gone: Vec<EntityId> = self
            .combatants
            .values()
            .filter(|c| c.destroyed)
            .map(|c| c.id)
            .collect();
        for id in &gone {
            self.combatants.remove(id);
        }
        gone
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.values_mut()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Combatant controlled by the given player slot
    pub fn player_pawn(&self, slot: usize) -> Option<&Combatant> {
        self.combatants.values().find(|c| c.player_slot() == Some(slot))
    }

    /// Health of a combatant, or `None` if it does not exist
    pub fn health(&self, id: EntityId) -> Option<i32> {
        self.get(id).map(|c| c.health)
    }

    /// Advance inventory timers and state durations by one tick
    pub fn tick(&mut self) {
        for combatant in self.combatants.values_mut() {
            combatant.inventory.tick();
            if combatant.threshold > 0 {
                combatant.threshold -= 1;
            }
            if let Some(state) = combatant.state.as_mut() {
                if state.tics > 0 {
                    state.tics -= 1;
                }
            }
        }
    }
}
