//! Match rules and skill settings

use serde::{Deserialize, Serialize};

/// Difficulty-dependent properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProperties {
    /// Multiplier on damage taken by players
    #[serde(default = "default_damage_factor")]
    pub damage_factor: f64,
    /// Monsters never enter pain states
    #[serde(default)]
    pub no_pain: bool,
    /// Players automatically consume health items on lethal hits
    #[serde(default)]
    pub auto_use_health: bool,
}

impl Default for SkillProperties {
    fn default() -> Self {
        SkillProperties {
            damage_factor: default_damage_factor(),
            no_pain: false,
            auto_use_health: false,
        }
    }
}

fn default_damage_factor() -> f64 {
    1.0
}

/// Game mode rules that affect scoring and friendly fire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRules {
    #[serde(default)]
    pub deathmatch: bool,
    #[serde(default)]
    pub teamplay: bool,
    #[serde(default)]
    pub multiplayer: bool,
    /// Multiplier on damage between teammates
    #[serde(default = "default_team_damage")]
    pub team_damage: f64,
    /// Frags needed to end the level (0 = no limit)
    #[serde(default)]
    pub frag_limit: i32,
    /// Victims lose a frag when killed by another player
    #[serde(default)]
    pub lose_frag: bool,
    /// Disable the generic freeze death
    #[serde(default)]
    pub no_autofreeze: bool,
    /// Number of bots in the game
    #[serde(default)]
    pub bot_count: u32,
    #[serde(default)]
    pub skill: SkillProperties,
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules {
            deathmatch: false,
            teamplay: false,
            multiplayer: false,
            team_damage: default_team_damage(),
            frag_limit: 0,
            lose_frag: false,
            no_autofreeze: false,
            bot_count: 0,
            skill: SkillProperties::default(),
        }
    }
}

fn default_team_damage() -> f64 {
    1.0
}

impl MatchRules {
    /// Deathmatch rules with the given frag limit
    pub fn deathmatch(frag_limit: i32) -> Self {
        MatchRules {
            deathmatch: true,
            multiplayer: true,
            frag_limit,
            ..Default::default()
        }
    }

    /// Cooperative rules with the given friendly-fire coefficient
    pub fn cooperative(team_damage: f64) -> Self {
        MatchRules {
            multiplayer: true,
            team_damage,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = MatchRules::default();
        assert!(!rules.deathmatch);
        assert!((rules.team_damage - 1.0).abs() < f64::EPSILON);
        assert!((rules.skill.damage_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rules() {
        let toml = r#"
deathmatch = true
teamplay = true
team_damage = 0.5
frag_limit = 20

[skill]
damage_factor = 0.5
no_pain = true
"#;

        let rules: MatchRules = toml::from_str(toml).unwrap();
        assert!(rules.deathmatch);
        assert_eq!(rules.frag_limit, 20);
        assert!((rules.skill.damage_factor - 0.5).abs() < f64::EPSILON);
        assert!(rules.skill.no_pain);
        assert!(!rules.skill.auto_use_health);
    }
}
