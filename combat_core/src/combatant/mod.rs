//! Combatant - A live entity that can take and deal damage

mod faction;
mod flags;
mod hooks;
mod player;
mod state;

pub use faction::{is_friend, is_hostile, is_teammate, team_of};
pub use flags::ActorFlags;
pub use hooks::CombatHooks;
pub use player::{BotState, Cheats, LifeState, PlayerPawn, ReadyWeapon};
pub use state::{labels, ActiveState, StateTable};

use crate::config::CombatantClass;
use crate::defense::{Inventory, InventoryItem};
use crate::types::{DamageKind, EntityId, PlayerSlot};
use glam::DVec3;
use std::sync::Arc;

/// A simulated entity
///
/// Health is only ever lowered by the damage pipeline.
#[derive(Debug)]
pub struct Combatant {
    pub id: EntityId,
    pub class: Arc<CombatantClass>,
    pub health: i32,
    pub flags: ActorFlags,
    pub player: Option<PlayerPawn>,
    /// Team under teamplay
    pub team: Option<u8>,
    /// Player a friendly monster belongs to (0 = any)
    pub friend_player: u8,
    pub state: Option<ActiveState>,

    // === Per-instance copies of class tuning ===
    pub gib_health: i32,
    /// Base pain chance out of 256
    pub pain_chance: u16,
    pub pain_threshold: i32,
    pub damage_factor: f64,
    pub damage_multiply: f64,
    pub mass: f64,
    pub height: f64,

    // === Physics ===
    pub position: DVec3,
    pub velocity: DVec3,
    /// Render fullbright (set by electrocution)
    pub full_bright: bool,

    pub inventory: Inventory,
    pub hooks: Option<Arc<dyn CombatHooks>>,

    // === Threat tracking ===
    pub target: Option<EntityId>,
    pub last_enemy: Option<EntityId>,
    /// Master of a summoned monster
    pub tracer: Option<EntityId>,
    /// Ticks left before the current target may be replaced
    pub threshold: i32,
    pub reaction_time: i32,
    /// Tag of things this actor hates (0 = none)
    pub hate_tid: i32,

    // === Death bookkeeping ===
    /// Damage type of the blow that killed this actor
    pub damage_type: DamageKind,
    /// Last damage type received
    pub damage_type_received: DamageKind,
    /// Damage of the killing blow
    pub killing_blow: i32,
    /// Thing special run on death
    pub special: Option<i32>,
    pub destroyed: bool,
}

impl Combatant {
    /// Spawn a combatant from its class, in its spawn state
    pub fn spawn(id: EntityId, class: Arc<CombatantClass>) -> Self {
        let state = class.states.find(&[labels::SPAWN], true);
        Combatant {
            id,
            health: class.spawn_health,
            flags: class.flags,
            player: None,
            team: None,
            friend_player: 0,
            state,
            gib_health: class.gib_health(),
            pain_chance: class.pain_chance,
            pain_threshold: class.pain_threshold,
            damage_factor: class.damage_factor,
            damage_multiply: class.damage_multiply,
            mass: class.mass,
            height: class.height,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            full_bright: false,
            inventory: Inventory::new(),
            hooks: None,
            target: None,
            last_enemy: None,
            tracer: None,
            threshold: 0,
            reaction_time: 0,
            hate_tid: 0,
            damage_type: DamageKind::none(),
            damage_type_received: DamageKind::none(),
            killing_blow: 0,
            special: None,
            destroyed: false,
            class,
        }
    }

    pub fn with_player(mut self, pawn: PlayerPawn) -> Self {
        self.player = Some(pawn);
        self
    }

    pub fn with_team(mut self, team: u8) -> Self {
        self.team = Some(team);
        self
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_flags(mut self, flags: ActorFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_item(mut self, item: impl InventoryItem + 'static) -> Self {
        self.inventory.add(item);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CombatHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn player_slot(&self) -> Option<PlayerSlot> {
        self.player.as_ref().map(|p| p.slot)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Spawn health, used as the cap for healing
    pub fn max_health(&self) -> i32 {
        self.class.spawn_health
    }

    pub fn wound_health(&self, default: i32) -> i32 {
        self.class.wound_health.unwrap_or(default)
    }

    /// Look up a state in this combatant's class
    pub fn find_state(&self, labels: &[&str], exact: bool) -> Option<ActiveState> {
        self.class.states.find(labels, exact)
    }

    pub fn set_state(&mut self, state: ActiveState) {
        self.state = Some(state);
    }

    /// Currently in the state it spawned in
    pub fn in_spawn_state(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is(labels::SPAWN))
    }

    /// Horizontal angle (radians) from this combatant to `other`
    pub fn angle_to(&self, other: &Combatant) -> f64 {
        let d = other.position - self.position;
        d.y.atan2(d.x)
    }

    /// Shares the exact horizontal position with `other`
    pub fn overlaps_xy(&self, other: &Combatant) -> bool {
        self.position.x == other.position.x && self.position.y == other.position.y
    }
}
