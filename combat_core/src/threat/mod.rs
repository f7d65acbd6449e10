//! Threat and score tracking - Aggression after hits, counters after deaths

mod aggression;
mod score;

pub use aggression::okay_to_switch_target;
pub(crate) use aggression::provoke;
pub use score::{record_death, KillInfo, KillReport, MatchState, MultikillTier, PlayerScore, SpreeTier};
