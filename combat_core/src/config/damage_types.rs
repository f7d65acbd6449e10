//! Damage type definitions

use super::ConfigError;
use crate::types::{scale_damage, DamageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Global properties of a damage type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageTypeDef {
    pub name: DamageKind,
    /// Factor applied when a class has no entry for this type
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// Class `normal` factors do not apply to this type
    #[serde(default)]
    pub replace_factor: bool,
    /// Armor never absorbs this type
    #[serde(default)]
    pub no_armor: bool,
    /// Generic death state used when a class lacks a typed one
    #[serde(default)]
    pub generic_death: Option<String>,
}

fn default_factor() -> f64 {
    1.0
}

impl DamageTypeDef {
    pub fn new(name: impl Into<DamageKind>) -> Self {
        DamageTypeDef {
            name: name.into(),
            factor: 1.0,
            replace_factor: false,
            no_armor: false,
            generic_death: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DamageTypesConfig {
    #[serde(default)]
    damage_types: Vec<DamageTypeDef>,
}

/// Registry of damage type definitions
#[derive(Debug, Clone)]
pub struct DamageTypeRegistry {
    defs: HashMap<DamageKind, DamageTypeDef>,
}

impl Default for DamageTypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DamageTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        DamageTypeRegistry {
            defs: HashMap::new(),
        }
    }

    /// Registry holding the built-in types
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let mut ice = DamageTypeDef::new(DamageKind::ICE);
        ice.generic_death = Some("GenericFreezeDeath".to_string());
        registry.register(ice);
        registry
    }

    pub fn register(&mut self, def: DamageTypeDef) {
        self.defs.insert(def.name.clone(), def);
    }

    pub fn get(&self, kind: &DamageKind) -> Option<&DamageTypeDef> {
        self.defs.get(kind)
    }

    /// Whether armor should be skipped for this type
    pub fn ignores_armor(&self, kind: &DamageKind) -> bool {
        self.get(kind).is_some_and(|d| d.no_armor)
    }

    /// Generic death state label for this type, if any
    pub fn generic_death(&self, kind: &DamageKind) -> Option<&str> {
        self.get(kind).and_then(|d| d.generic_death.as_deref())
    }

    /// Apply a class damage factor table to `damage`
    ///
    /// Lookup order: the class entry for `kind`, then the class `normal`
    /// entry (unless the type replaces it), then the type's global factor.
    pub fn apply_factor(&self, damage: i32, kind: &DamageKind, factors: &HashMap<DamageKind, f64>) -> i32 {
        if let Some(factor) = factors.get(kind) {
            return scale_damage(damage, *factor);
        }
        let def = self.get(kind);
        let replaces = def.is_some_and(|d| d.replace_factor);
        if !replaces {
            if let Some(factor) = factors.get(&DamageKind::new("normal")) {
                return scale_damage(damage, *factor);
            }
        }
        match def {
            Some(d) => scale_damage(damage, d.factor),
            None => damage,
        }
    }

    /// Load damage types from a TOML file, on top of the built-ins
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: DamageTypesConfig = super::load_toml(path)?;
        Ok(Self::from_defs(config.damage_types))
    }

    /// Parse damage types from a TOML string, on top of the built-ins
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: DamageTypesConfig = super::parse_toml(content)?;
        Ok(Self::from_defs(config.damage_types))
    }

    pub(crate) fn from_defs(defs: Vec<DamageTypeDef>) -> Self {
        let mut registry = Self::with_defaults();
        for def in defs {
            registry.register(def);
        }
        registry
    }
}
