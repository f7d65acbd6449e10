//! Combatant class configuration loading

use super::ConfigError;
use crate::combatant::{ActorFlags, StateTable};
use crate::types::DamageKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Static definition shared by every combatant of a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantClass {
    pub name: String,
    #[serde(default = "default_spawn_health")]
    pub spawn_health: i32,
    /// Health below which a death is extreme (default: -spawn_health)
    #[serde(default)]
    pub gib_health: Option<i32>,
    /// Base pain chance out of 256
    #[serde(default)]
    pub pain_chance: u16,
    /// Pain chance per damage type, out of 256
    #[serde(default)]
    pub pain_chances: HashMap<DamageKind, u16>,
    /// Minimum damage that can cause pain
    #[serde(default)]
    pub pain_threshold: i32,
    /// Health at or below which a wound state triggers
    #[serde(default)]
    pub wound_health: Option<i32>,
    #[serde(default = "default_factor")]
    pub damage_factor: f64,
    #[serde(default)]
    pub damage_factors: HashMap<DamageKind, f64>,
    /// Multiplier on damage this class deals
    #[serde(default = "default_factor")]
    pub damage_multiply: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub death_height: Option<f64>,
    #[serde(default)]
    pub burn_height: Option<f64>,
    /// Kickback when this class is the inflictor (0 = use defaults)
    #[serde(default)]
    pub projectile_kickback: i32,
    /// Damage type used for deaths this class inflicts
    #[serde(default)]
    pub death_type: DamageKind,
    /// Damage type used for pain states this class inflicts
    #[serde(default)]
    pub pain_type: DamageKind,
    #[serde(default)]
    pub flags: ActorFlags,
    #[serde(default)]
    pub states: StateTable,
}

fn default_spawn_health() -> i32 {
    100
}
fn default_factor() -> f64 {
    1.0
}
fn default_mass() -> f64 {
    100.0
}
fn default_height() -> f64 {
    56.0
}

impl CombatantClass {
    /// A bare class with defaults for everything but the name
    pub fn new(name: impl Into<String>) -> Self {
        CombatantClass {
            name: name.into(),
            spawn_health: default_spawn_health(),
            gib_health: None,
            pain_chance: 0,
            pain_chances: HashMap::new(),
            pain_threshold: 0,
            wound_health: None,
            damage_factor: default_factor(),
            damage_factors: HashMap::new(),
            damage_multiply: default_factor(),
            mass: default_mass(),
            height: default_height(),
            death_height: None,
            burn_height: None,
            projectile_kickback: 0,
            death_type: DamageKind::none(),
            pain_type: DamageKind::none(),
            flags: ActorFlags::empty(),
            states: StateTable::new(),
        }
    }

    /// A shootable, kill-counting monster with spawn/see/pain/death states
    pub fn monster(name: impl Into<String>, spawn_health: i32) -> Self {
        let mut class = Self::new(name);
        class.spawn_health = spawn_health;
        class.pain_chance = 128;
        class.flags = ActorFlags::SHOOTABLE | ActorFlags::SOLID | ActorFlags::IS_MONSTER | ActorFlags::COUNT_KILL;
        class.states = StateTable::new()
            .with("Spawn", 10)
            .with("See", 4)
            .with("Pain", 3)
            .with("Death", 5);
        class
    }

    /// A player pawn class
    pub fn player(name: impl Into<String>) -> Self {
        let mut class = Self::new(name);
        class.pain_chance = 255;
        class.flags = ActorFlags::SHOOTABLE | ActorFlags::SOLID | ActorFlags::DROPOFF;
        class.states = StateTable::new()
            .with("Spawn", -1)
            .with("See", 4)
            .with("Pain", 4)
            .with("Death", 10)
            .with("Death.Extreme", 5);
        class
    }

    /// A projectile that only inflicts damage
    pub fn missile(name: impl Into<String>) -> Self {
        let mut class = Self::new(name);
        class.flags = ActorFlags::MISSILE | ActorFlags::NO_GRAVITY;
        class.states = StateTable::new().with("Spawn", 4).with("Death", 4);
        class
    }

    pub fn gib_health(&self) -> i32 {
        self.gib_health.unwrap_or(-self.spawn_health)
    }

    /// Pain chance for a damage type, falling back to the base chance
    pub fn pain_chance_for(&self, kind: &DamageKind, base: u16) -> u16 {
        self.pain_chances.get(kind).copied().unwrap_or(base)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError("class name must not be empty".to_string()));
        }
        if self.spawn_health <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "class '{}' needs a positive spawn_health",
                self.name
            )));
        }
        if let Some((kind, chance)) = self.pain_chances.iter().find(|(_, c)| **c > 256) {
            return Err(ConfigError::ValidationError(format!(
                "class '{}' pain chance for '{}' is {} (max 256)",
                self.name, kind, chance
            )));
        }
        Ok(())
    }
}

/// Container for class configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesConfig {
    #[serde(rename = "classes", default)]
    pub classes: Vec<CombatantClass>,
}

/// Classes by lowercase name
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<CombatantClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: CombatantClass) -> Arc<CombatantClass> {
        let class = Arc::new(class);
        self.classes.insert(class.name.to_ascii_lowercase(), Arc::clone(&class));
        class
    }

    pub fn get(&self, name: &str) -> Option<Arc<CombatantClass>> {
        self.classes.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub(crate) fn from_classes(classes: Vec<CombatantClass>) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for class in classes {
            class.validate()?;
            registry.register(class);
        }
        Ok(registry)
    }
}

/// Load class configurations from a TOML file
pub fn load_class_configs(path: &Path) -> Result<ClassRegistry, ConfigError> {
    let config: ClassesConfig = super::load_toml(path)?;
    ClassRegistry::from_classes(config.classes)
}

/// Load class configurations from a TOML string
pub fn parse_class_configs(content: &str) -> Result<ClassRegistry, ConfigError> {
    let config: ClassesConfig = super::parse_toml(content)?;
    ClassRegistry::from_classes(config.classes)
}
