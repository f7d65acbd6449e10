//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{DamageKind, EntityId, PlayerSlot};
pub use crate::world::World;

// Combatants
pub use crate::combatant::{ActorFlags, Cheats, Combatant, CombatHooks, PlayerPawn};
pub use crate::defense::{BasicArmor, DamagePower, HealthReserve, InventoryItem};

// Damage and resolution
pub use crate::combat::{resolve_damage, CombatContext, Outcome, Resolution};
pub use crate::damage::{DamageEvent, DamageFlags};
pub use crate::reaction::{DeathPresentation, Reaction};

// Scoring
pub use crate::threat::{MatchState, MultikillTier, SpreeTier};

// Config
pub use crate::config::{ClassRegistry, CombatConfig, CombatantClass, MatchRules};

// Driver
pub use crate::events::{CombatEvent, EventSink};
pub use crate::random::RandomStreams;
pub use crate::simulation::Simulation;
