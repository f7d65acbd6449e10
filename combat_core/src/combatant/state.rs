//! State labels and lookup
//!
//! States are addressed by dotted label paths such as `Death`,
//! `Death.Fire` or `Death.Extreme.Fire`. Only their duration matters to
//! the combat pipeline; animation and actions belong to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known state labels
pub mod labels {
    pub const SPAWN: &str = "Spawn";
    pub const SEE: &str = "See";
    pub const PAIN: &str = "Pain";
    pub const WOUND: &str = "Wound";
    pub const DEATH: &str = "Death";
    pub const EXTREME: &str = "Extreme";
    pub const RAISE: &str = "Raise";
}

/// A state the combatant is currently in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveState {
    /// Dotted label path of the state
    pub label: String,
    /// Ticks left in the state (-1 = forever)
    pub tics: i32,
}

impl ActiveState {
    pub fn is(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

/// State durations keyed by lowercase dotted label path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, i32>", into = "HashMap<String, i32>")]
pub struct StateTable {
    states: HashMap<String, i32>,
}

impl From<HashMap<String, i32>> for StateTable {
    fn from(raw: HashMap<String, i32>) -> Self {
        let mut table = StateTable::default();
        for (label, tics) in raw {
            table.insert(&label, tics);
        }
        table
    }
}

impl From<StateTable> for HashMap<String, i32> {
    fn from(table: StateTable) -> Self {
        table.states
    }
}

fn key(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|l| l.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state by dotted label, e.g. `"Death.Fire"`
    pub fn insert(&mut self, label: &str, tics: i32) {
        let parts: Vec<&str> = label.split('.').map(str::trim).collect();
        self.states.insert(key(&parts), tics);
    }

    pub fn with(mut self, label: &str, tics: i32) -> Self {
        self.insert(label, tics);
        self
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Find a state by label path
    ///
    /// With `exact` the full path must exist. Otherwise the deepest
    /// existing prefix of the path is returned, so `Pain.Fire` falls back
    /// to `Pain`.
    pub fn find(&self, labels: &[&str], exact: bool) -> Option<ActiveState> {
        if labels.is_empty() {
            return None;
        }
        let depth = if exact { labels.len() } else { 1 };
        for len in (depth..=labels.len()).rev() {
            let k = key(&labels[..len]);
            if let Some(&tics) = self.states.get(&k) {
                return Some(ActiveState { label: k, tics });
            }
        }
        None
    }

    /// Whether any typed death state (`Death.<type>`) exists
    pub fn has_special_death_states(&self) -> bool {
        self.states.keys().any(|k| k.starts_with("death."))
    }
}
