//! Match scoring - Kill counters, frags, sprees and multikills

use crate::config::{CombatConstants, MatchRules};
use crate::events::{CombatEvent, EventSink};
use crate::types::{EntityId, PlayerSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Announced kill-streak tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreeTier {
    KillingSpree,
    Rampage,
    Dominating,
    Unstoppable,
    Godlike,
}

impl SpreeTier {
    /// Tier announced when a spree reaches exactly `count` kills
    pub fn from_count(count: u32, step: u32, max: u32) -> Option<Self> {
        if step == 0 || count == 0 || count > max || count % step != 0 {
            return None;
        }
        match count / step {
            1 => Some(SpreeTier::KillingSpree),
            2 => Some(SpreeTier::Rampage),
            3 => Some(SpreeTier::Dominating),
            4 => Some(SpreeTier::Unstoppable),
            5 => Some(SpreeTier::Godlike),
            _ => None,
        }
    }
}

/// Kills chained within the multikill window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultikillTier {
    Single,
    Double,
    Multi,
    Ultra,
    Monster,
}

impl MultikillTier {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 | 1 => MultikillTier::Single,
            2 => MultikillTier::Double,
            3 => MultikillTier::Multi,
            4 => MultikillTier::Ultra,
            _ => MultikillTier::Monster,
        }
    }

    /// Number of chained kills this tier stands for (5 = five or more)
    pub fn level(self) -> u32 {
        match self {
            MultikillTier::Single => 1,
            MultikillTier::Double => 2,
            MultikillTier::Multi => 3,
            MultikillTier::Ultra => 4,
            MultikillTier::Monster => 5,
        }
    }
}

/// Per-player counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    /// Kill-counting actors killed (intermission tally)
    pub kill_count: u32,
    /// Times this player fragged each player slot
    pub frags: BTreeMap<PlayerSlot, i32>,
    /// Cumulative frag count, with self and team kills subtracted
    pub frag_count: i32,
    pub spree_count: u32,
    pub multi_count: u32,
    /// Level time of the previous player kill
    pub last_kill_time: Option<u32>,
}

/// Level-wide counters owned by the simulation driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Ticks since the level started
    pub level_time: u32,
    /// Ticks since the map started; frags at time 0 are not counted
    pub map_time: u32,
    pub killed_monsters: u32,
    pub scores: BTreeMap<PlayerSlot, PlayerScore>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, slot: PlayerSlot) -> Option<&PlayerScore> {
        self.scores.get(&slot)
    }

    pub fn score_mut(&mut self, slot: PlayerSlot) -> &mut PlayerScore {
        self.scores.entry(slot).or_default()
    }

    pub fn advance(&mut self, tics: u32) {
        self.level_time += tics;
        self.map_time += tics;
    }
}

/// Who died and who gets the credit
#[derive(Debug, Clone)]
pub struct KillInfo {
    pub victim: EntityId,
    pub victim_slot: Option<PlayerSlot>,
    pub counts_as_kill: bool,
    pub source: Option<EntityId>,
    /// Slot of the source, when the source is a player
    pub source_slot: Option<PlayerSlot>,
    /// Victim and source are on the same team
    pub teammates: bool,
}

/// What the scoring pass changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KillReport {
    /// The global kill counter went up
    pub counted_kill: bool,
    /// Change to the source's frag count
    pub frag_delta: i32,
    pub spree: Option<SpreeTier>,
    pub multikill: Option<MultikillTier>,
    pub frag_limit_reached: bool,
}

/// Update every counter affected by a death
pub fn record_death(
    state: &mut MatchState,
    constants: &CombatConstants,
    rules: &MatchRules,
    kill: &KillInfo,
    events: &mut dyn EventSink,
) -> KillReport {
    let mut report = KillReport::default();

    if kill.counts_as_kill {
        state.killed_monsters += 1;
        report.counted_kill = true;
    }

    if let (Some(source), Some(source_slot)) = (kill.source, kill.source_slot) {
        if kill.counts_as_kill {
            state.score_mut(source_slot).kill_count += 1;
        }
        if let Some(victim_slot) = kill.victim_slot.filter(|_| state.map_time > 0) {
            *state.score_mut(source_slot).frags.entry(victim_slot).or_insert(0) += 1;

            if victim_slot == source_slot {
                let score = state.score_mut(victim_slot);
                score.frag_count -= 1;
                report.frag_delta = -1;
                if rules.deathmatch && score.spree_count >= constants.spree_step {
                    events.emit(CombatEvent::SpreeKillSelf { victim: kill.victim });
                }
            } else {
                credit_frag(state, constants, rules, kill, source, source_slot, victim_slot, events, &mut report);
                chain_multikill(state, constants, rules, kill.victim, source, source_slot, events, &mut report);
            }

            let frag_count = state.score_mut(source_slot).frag_count;
            if rules.deathmatch && rules.frag_limit > 0 && rules.frag_limit <= frag_count {
                info!(player = source_slot, frag_count, "frag limit reached");
                report.frag_limit_reached = true;
                events.emit(CombatEvent::ExitLevelRequested { player: source });
            }
        }
    } else if !rules.multiplayer && kill.counts_as_kill {
        state.score_mut(0).kill_count += 1;
    }

    if let (Some(victim_slot), None) = (kill.victim_slot, kill.source) {
        let score = state.score_mut(victim_slot);
        *score.frags.entry(victim_slot).or_insert(0) += 1;
        score.frag_count -= 1;
    }

    debug!(victim = %kill.victim, ?report, "death recorded");
    report
}

#[allow(clippy::too_many_arguments)]
fn credit_frag(
    state: &mut MatchState,
    constants: &CombatConstants,
    rules: &MatchRules,
    kill: &KillInfo,
    source: EntityId,
    source_slot: PlayerSlot,
    victim_slot: PlayerSlot,
    events: &mut dyn EventSink,
    report: &mut KillReport,
) {
    if rules.lose_frag && rules.deathmatch {
        state.score_mut(victim_slot).frag_count -= 1;
    }

    let score = state.score_mut(source_slot);
    if kill.teammates {
        score.frag_count -= 1;
        report.frag_delta = -1;
    } else {
        score.frag_count += 1;
        score.spree_count += 1;
        report.frag_delta = 1;
    }
    let spree = score.spree_count;

    if !rules.deathmatch {
        return;
    }
    match SpreeTier::from_count(spree, constants.spree_step, constants.spree_max) {
        Some(tier) => {
            report.spree = Some(tier);
            events.emit(CombatEvent::Spree {
                attacker: source,
                victim: kill.victim,
                tier,
            });
        }
        None => {
            let victim_spree = state.score_mut(victim_slot).spree_count;
            if victim_spree >= constants.spree_step {
                events.emit(CombatEvent::SpreeEnded {
                    attacker: source,
                    victim: kill.victim,
                    count: victim_spree,
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn chain_multikill(
    state: &mut MatchState,
    constants: &CombatConstants,
    rules: &MatchRules,
    victim: EntityId,
    source: EntityId,
    source_slot: PlayerSlot,
    events: &mut dyn EventSink,
    report: &mut KillReport,
) {
    let now = state.level_time;
    let window = constants.multikill_window_tics();
    let score = state.score_mut(source_slot);

    score.multi_count += 1;
    if let Some(last) = score.last_kill_time {
        if (last as i64) < now as i64 - window as i64 {
            score.multi_count = 1;
        }
        let tier = MultikillTier::from_count(score.multi_count);
        if rules.deathmatch && tier != MultikillTier::Single {
            events.emit(CombatEvent::Multikill {
                attacker: source,
                victim,
                tier,
            });
        }
    }
    report.multikill = Some(MultikillTier::from_count(score.multi_count));
    score.last_kill_time = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_kill(victim: u32, victim_slot: PlayerSlot, source: u32, source_slot: PlayerSlot) -> KillInfo {
        KillInfo {
            victim: EntityId(victim),
            victim_slot: Some(victim_slot),
            counts_as_kill: false,
            source: Some(EntityId(source)),
            source_slot: Some(source_slot),
            teammates: false,
        }
    }

    fn started_match() -> MatchState {
        let mut state = MatchState::new();
        state.advance(1);
        state
    }

    #[test]
    fn test_spree_tiers() {
        assert_eq!(SpreeTier::from_count(5, 5, 25), Some(SpreeTier::KillingSpree));
        assert_eq!(SpreeTier::from_count(25, 5, 25), Some(SpreeTier::Godlike));
        assert_eq!(SpreeTier::from_count(7, 5, 25), None);
        assert_eq!(SpreeTier::from_count(30, 5, 25), None);
        assert_eq!(SpreeTier::from_count(10, 5, 5), None);
    }

    #[test]
    fn test_multikill_tier_levels() {
        assert_eq!(MultikillTier::from_count(1).level(), 1);
        assert_eq!(MultikillTier::from_count(3), MultikillTier::Multi);
        assert_eq!(MultikillTier::from_count(9).level(), 5);
    }

    #[test]
    fn test_monster_kill_counts() {
        let mut state = MatchState::new();
        let kill = KillInfo {
            victim: EntityId(9),
            victim_slot: None,
            counts_as_kill: true,
            source: None,
            source_slot: None,
            teammates: false,
        };
        let report = record_death(&mut state, &CombatConstants::default(), &MatchRules::default(), &kill, &mut Vec::new());
        assert!(report.counted_kill);
        assert_eq!(state.killed_monsters, 1);
        // Single player credits player 0 for every monster death
        assert_eq!(state.score(0).map(|s| s.kill_count), Some(1));
    }

    #[test]
    fn test_multikill_window() {
        let constants = CombatConstants::default();
        let rules = MatchRules::deathmatch(0);
        let mut state = started_match();
        let mut events = Vec::new();

        let mut last = None;
        for victim in 2..5 {
            let report = record_death(&mut state, &constants, &rules, &player_kill(victim, victim as usize, 1, 0), &mut events);
            last = report.multikill;
            state.advance(10);
        }
        assert_eq!(last.map(MultikillTier::level), Some(3));

        state.advance(constants.multikill_window_tics() + 1);
        let report = record_death(&mut state, &constants, &rules, &player_kill(5, 5, 1, 0), &mut events);
        assert_eq!(report.multikill.map(MultikillTier::level), Some(1));

        let announced: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::Multikill { tier, .. } => Some(*tier),
                _ => None,
            })
            .collect();
        assert_eq!(announced, vec![MultikillTier::Double, MultikillTier::Multi]);
    }

    #[test]
    fn test_self_kill_costs_a_frag() {
        let mut state = started_match();
        let report = record_death(
            &mut state,
            &CombatConstants::default(),
            &MatchRules::deathmatch(0),
            &player_kill(1, 0, 1, 0),
            &mut Vec::new(),
        );
        assert_eq!(report.frag_delta, -1);
        assert_eq!(state.score(0).map(|s| s.frag_count), Some(-1));
        assert_eq!(report.multikill, None);
    }

    #[test]
    fn test_team_kill_costs_a_frag() {
        let mut state = started_match();
        let mut kill = player_kill(2, 1, 1, 0);
        kill.teammates = true;
        record_death(&mut state, &CombatConstants::default(), &MatchRules::deathmatch(0), &kill, &mut Vec::new());
        let score = state.score(0).unwrap();
        assert_eq!(score.frag_count, -1);
        assert_eq!(score.spree_count, 0);
        assert_eq!(score.frags.get(&1), Some(&1));
    }

    #[test]
    fn test_spree_announced_and_ended() {
        let constants = CombatConstants::default();
        let rules = MatchRules::deathmatch(0);
        let mut state = started_match();
        let mut events = Vec::new();

        for _ in 0..5 {
            record_death(&mut state, &constants, &rules, &player_kill(2, 1, 1, 0), &mut events);
        }
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Spree { tier: SpreeTier::KillingSpree, .. })));

        record_death(&mut state, &constants, &rules, &player_kill(1, 0, 2, 1), &mut events);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::SpreeEnded { count: 5, .. })));
    }

    #[test]
    fn test_frag_limit_requests_exit() {
        let mut state = started_match();
        let mut events = Vec::new();
        let report = record_death(
            &mut state,
            &CombatConstants::default(),
            &MatchRules::deathmatch(1),
            &player_kill(2, 1, 1, 0),
            &mut events,
        );
        assert!(report.frag_limit_reached);
        assert!(events.contains(&CombatEvent::ExitLevelRequested { player: EntityId(1) }));
    }

    #[test]
    fn test_no_frags_at_map_start() {
        let mut state = MatchState::new();
        record_death(
            &mut state,
            &CombatConstants::default(),
            &MatchRules::deathmatch(0),
            &player_kill(2, 1, 1, 0),
            &mut Vec::new(),
        );
        assert_eq!(state.score(0).map_or(0, |s| s.frag_count), 0);
        assert_eq!(state.score(0).map_or(0, |s| s.frags.len()), 0);
    }

    #[test]
    fn test_environment_kill() {
        let mut state = started_match();
        let kill = KillInfo {
            victim: EntityId(1),
            victim_slot: Some(2),
            counts_as_kill: false,
            source: None,
            source_slot: None,
            teammates: false,
        };
        record_death(&mut state, &CombatConstants::default(), &MatchRules::deathmatch(0), &kill, &mut Vec::new());
        let score = state.score(2).unwrap();
        assert_eq!(score.frag_count, -1);
        assert_eq!(score.frags.get(&2), Some(&1));
    }
}
