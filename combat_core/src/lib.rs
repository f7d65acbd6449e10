//! combat_core - Damage, pain and death resolution for simulated combatants
//!
//! This library provides:
//! - DamageEvent: A single hit against a target
//! - resolve_damage: The modifier pipeline, from invulnerability to armor
//! - Reactions: Pain, wound and death state selection
//! - MatchState: Kill counts, frags, sprees and multikills
//! - Simulation: A world driver that replays TOML scenarios

pub mod combat;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod defense;
pub mod events;
pub mod prelude;
pub mod random;
pub mod reaction;
pub mod simulation;
pub mod threat;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use combat::{resolve_damage, CombatContext, DeathReport, Outcome, Resolution};
pub use combatant::{ActorFlags, Cheats, Combatant, PlayerPawn};
pub use config::{CombatConfig, CombatConstants, MatchRules};
pub use damage::{DamageEvent, DamageFlags};
pub use events::{CombatEvent, EventSink};
pub use random::{RandomStream, RandomStreams};
pub use reaction::{DeathPresentation, Reaction};
pub use simulation::{HitRecord, ScenarioReport, Simulation};
pub use threat::{KillReport, MatchState, MultikillTier, SpreeTier};
pub use types::{DamageKind, EntityId, PlayerSlot};
pub use world::World;
