//! Tunable combat constants

use crate::types::{TELEFRAG_DAMAGE, TICRATE};
use serde::{Deserialize, Serialize};

/// Fixed numbers the pipeline compares against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Raw damage at or above this is a telefrag
    #[serde(default = "default_telefrag_damage")]
    pub telefrag_damage: i32,
    /// Simulation ticks per second
    #[serde(default = "default_tic_rate")]
    pub tic_rate: u32,
    /// Ticks a monster stays locked on a new target
    #[serde(default = "default_base_threshold")]
    pub base_threshold: i32,
    /// Seconds between kills before a multikill chain resets
    #[serde(default = "default_multikill_window_secs")]
    pub multikill_window_secs: u32,
    /// Kickback used when neither inflictor nor weapon provide one
    #[serde(default = "default_kickback")]
    pub default_kickback: i32,
    /// Ticks a dead player must wait before respawning
    #[serde(default = "default_tic_rate")]
    pub respawn_delay_tics: u32,
    /// Health at or below which a wound state is entered
    #[serde(default = "default_wound_health")]
    pub default_wound_health: i32,
    /// Odds out of 256 that electric damage causes a regular pain state
    #[serde(default = "default_electric_pain_odds")]
    pub electric_pain_odds: u8,
    /// Odds out of 256 that a monster howls
    #[serde(default = "default_howl_odds")]
    pub howl_odds: u8,
    /// Thrust cap for ordinary hits
    #[serde(default = "default_max_thrust")]
    pub max_thrust: f64,
    /// Thrust cap for `mdk` damage
    #[serde(default = "default_mdk_max_thrust")]
    pub mdk_max_thrust: f64,
    /// Cap on the player damage counter
    #[serde(default = "default_max_damage_count")]
    pub max_damage_count: i32,
    /// Kills per spree tier
    #[serde(default = "default_spree_step")]
    pub spree_step: u32,
    /// Highest announced spree count
    #[serde(default = "default_spree_max")]
    pub spree_max: u32,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            telefrag_damage: default_telefrag_damage(),
            tic_rate: default_tic_rate(),
            base_threshold: default_base_threshold(),
            multikill_window_secs: default_multikill_window_secs(),
            default_kickback: default_kickback(),
            respawn_delay_tics: default_tic_rate(),
            default_wound_health: default_wound_health(),
            electric_pain_odds: default_electric_pain_odds(),
            howl_odds: default_howl_odds(),
            max_thrust: default_max_thrust(),
            mdk_max_thrust: default_mdk_max_thrust(),
            max_damage_count: default_max_damage_count(),
            spree_step: default_spree_step(),
            spree_max: default_spree_max(),
        }
    }
}

impl CombatConstants {
    /// Multikill window expressed in ticks
    pub fn multikill_window_tics(&self) -> u32 {
        self.multikill_window_secs * self.tic_rate
    }

    pub fn is_telefrag(&self, raw_damage: i32) -> bool {
        raw_damage >= self.telefrag_damage
    }
}

fn default_telefrag_damage() -> i32 {
    TELEFRAG_DAMAGE
}
fn default_tic_rate() -> u32 {
    TICRATE
}
fn default_base_threshold() -> i32 {
    100
}
fn default_multikill_window_secs() -> u32 {
    3
}
fn default_kickback() -> i32 {
    100
}
fn default_wound_health() -> i32 {
    6
}
fn default_electric_pain_odds() -> u8 {
    96
}
fn default_howl_odds() -> u8 {
    128
}
fn default_max_thrust() -> f64 {
    32.0
}
fn default_mdk_max_thrust() -> f64 {
    10.0
}
fn default_max_damage_count() -> i32 {
    100
}
fn default_spree_step() -> u32 {
    5
}
fn default_spree_max() -> u32 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = CombatConstants::default();
        assert_eq!(constants.telefrag_damage, 1_000_000);
        assert_eq!(constants.multikill_window_tics(), 105);
        assert!(constants.is_telefrag(1_000_000));
        assert!(!constants.is_telefrag(999_999));
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
telefrag_damage = 5000
multikill_window_secs = 2
"#;

        let constants: CombatConstants = toml::from_str(toml).unwrap();
        assert_eq!(constants.telefrag_damage, 5000);
        assert_eq!(constants.multikill_window_tics(), 70);
        assert_eq!(constants.base_threshold, 100);
        assert_eq!(constants.respawn_delay_tics, 35);
    }
}
