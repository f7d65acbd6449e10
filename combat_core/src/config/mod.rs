//! Configuration loading from TOML files

mod classes;
mod constants;
mod damage_types;
mod rules;
mod scenario;

pub use classes::{load_class_configs, parse_class_configs, ClassRegistry, CombatantClass};
pub use constants::CombatConstants;
pub use damage_types::{DamageTypeDef, DamageTypeRegistry};
pub use rules::{MatchRules, SkillProperties};
pub use scenario::{load_scenario, parse_scenario, ItemSpec, Scenario, ScenarioError, ScenarioHit, ScenarioSpawn};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Everything the resolution pipeline reads but never writes
#[derive(Debug, Clone, Default)]
pub struct CombatConfig {
    pub constants: CombatConstants,
    pub rules: MatchRules,
    pub damage_types: DamageTypeRegistry,
}

impl CombatConfig {
    pub fn new(constants: CombatConstants, rules: MatchRules, damage_types: DamageTypeRegistry) -> Self {
        CombatConfig {
            constants,
            rules,
            damage_types,
        }
    }
}
