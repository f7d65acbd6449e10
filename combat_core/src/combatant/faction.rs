//! Team and allegiance queries

use super::Combatant;
use crate::config::MatchRules;
use crate::world::World;

/// Team a combatant plays for
///
/// Its own team when it has one. A friendly monster without a team plays
/// for the team of the player it belongs to.
pub fn team_of(combatant: &Combatant, world: &World) -> Option<u8> {
    if combatant.team.is_some() || combatant.is_player() || combatant.friend_player == 0 {
        return combatant.team;
    }
    let owner_slot = usize::from(combatant.friend_player - 1);
    world.player_pawn(owner_slot).and_then(|owner| owner.team)
}

/// Same side for friendly fire and frag scoring
///
/// In cooperative games every player is a teammate of every other player.
/// Under teamplay any two combatants on the same team are.
pub fn is_teammate(a: &Combatant, b: &Combatant, world: &World, rules: &MatchRules) -> bool {
    if !rules.deathmatch && a.is_player() && b.is_player() {
        return true;
    }
    if !rules.teamplay {
        return false;
    }
    let team = team_of(a, world);
    team.is_some() && team == team_of(b, world)
}

/// Friendly monsters on the same side, or teammates
pub fn is_friend(a: &Combatant, b: &Combatant, world: &World, rules: &MatchRules) -> bool {
    if is_teammate(a, b, world, rules) {
        return true;
    }
    if !(a.flags.is_friendly() && b.flags.is_friendly()) {
        return false;
    }
    !rules.deathmatch || a.friend_player == b.friend_player || a.friend_player == 0 || b.friend_player == 0
}

/// Opposing allegiances
///
/// Two unaligned actors are never hostile to each other. A friendly and an
/// unaligned actor always are. Two friendly actors are hostile only when
/// they belong to different players in deathmatch.
pub fn is_hostile(a: &Combatant, b: &Combatant, rules: &MatchRules) -> bool {
    let a_friendly = a.flags.is_friendly();
    let b_friendly = b.flags.is_friendly();
    if !a_friendly && !b_friendly {
        return false;
    }
    if a_friendly && b_friendly {
        return rules.deathmatch
            && a.friend_player != 0
            && b.friend_player != 0
            && a.friend_player != b.friend_player;
    }
    true
}
