//! Scenario - A scripted encounter loaded from TOML
//!
//! A scenario carries its own constants, rules, damage types and classes,
//! the combatants to spawn and the hits to replay, keyed by tic.

use super::{CombatConstants, CombatantClass, ConfigError, DamageTypeDef, MatchRules};
use crate::combatant::{ActorFlags, Cheats, Combatant};
use crate::damage::DamageFlags;
use crate::defense::{BasicArmor, DamagePower, HealthReserve};
use crate::types::{DamageKind, PlayerSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Error raised while turning a scenario into a running simulation
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown class '{0}'")]
    UnknownClass(String),
    #[error("Unknown combatant '{0}'")]
    UnknownCombatant(String),
    #[error("Duplicate combatant name '{0}'")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub constants: CombatConstants,
    #[serde(default)]
    pub rules: MatchRules,
    #[serde(default)]
    pub damage_types: Vec<DamageTypeDef>,
    #[serde(default)]
    pub classes: Vec<CombatantClass>,
    #[serde(rename = "spawn", default)]
    pub spawns: Vec<ScenarioSpawn>,
    #[serde(rename = "hit", default)]
    pub hits: Vec<ScenarioHit>,
}

/// One combatant placed at the start of the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpawn {
    pub name: String,
    pub class: String,
    /// Player slot; absent for monsters and projectiles
    #[serde(default)]
    pub player: Option<PlayerSlot>,
    #[serde(default)]
    pub team: Option<u8>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub cheats: Cheats,
    #[serde(default)]
    pub position: [f64; 3],
    /// Overrides the class spawn health
    #[serde(default)]
    pub health: Option<i32>,
    /// Added to the class flags
    #[serde(default)]
    pub flags: ActorFlags,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// Kickback of the held weapon (players only)
    #[serde(default)]
    pub kickback: Option<i32>,
    /// Player slot + 1 this monster is friendly to
    #[serde(default)]
    pub friend_player: u8,
    #[serde(default)]
    pub special: Option<i32>,
    /// Name of the master for summoned combatants
    #[serde(default)]
    pub tracer: Option<String>,
}

/// Carried items a spawn starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemSpec {
    Armor {
        amount: i32,
        save_percent: f64,
    },
    Protection {
        factor: f64,
        #[serde(default = "permanent")]
        tics: i32,
    },
    DamageBoost {
        factor: f64,
        #[serde(default = "permanent")]
        tics: i32,
    },
    Health {
        count: u32,
        heal_amount: i32,
    },
}

fn permanent() -> i32 {
    -1
}

impl ItemSpec {
    pub fn give(&self, combatant: Combatant) -> Combatant {
        match *self {
            ItemSpec::Armor { amount, save_percent } => combatant.with_item(BasicArmor::new(amount, save_percent)),
            ItemSpec::Protection { factor, tics } => combatant.with_item(DamagePower::protection(factor, tics)),
            ItemSpec::DamageBoost { factor, tics } => combatant.with_item(DamagePower::damage(factor, tics)),
            ItemSpec::Health { count, heal_amount } => combatant.with_item(HealthReserve::new(count, heal_amount)),
        }
    }
}

/// One damage event, addressed by combatant names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioHit {
    /// Level tic at which the hit lands
    #[serde(default)]
    pub tic: u32,
    pub target: String,
    #[serde(default)]
    pub inflictor: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub amount: i32,
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub flags: DamageFlags,
}

impl Scenario {
    /// Check names and references before anything is spawned
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut names = HashSet::new();
        for spawn in &self.spawns {
            if !names.insert(spawn.name.as_str()) {
                return Err(ScenarioError::DuplicateName(spawn.name.clone()));
            }
        }

        let known = |name: &Option<String>| -> Result<(), ScenarioError> {
            match name {
                Some(name) if !names.contains(name.as_str()) => Err(ScenarioError::UnknownCombatant(name.clone())),
                _ => Ok(()),
            }
        };
        for spawn in &self.spawns {
            known(&spawn.tracer)?;
        }
        for hit in &self.hits {
            known(&Some(hit.target.clone()))?;
            known(&hit.inflictor)?;
            known(&hit.source)?;
        }
        Ok(())
    }
}

/// Load a scenario from a TOML file
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = super::load_toml(path)?;
    scenario.validate()?;
    Ok(scenario)
}

/// Load a scenario from a TOML string
pub fn parse_scenario(content: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = super::parse_toml(content)?;
    scenario.validate()?;
    Ok(scenario)
}
