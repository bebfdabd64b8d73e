//! Teams and players. Team totals are recomputed from the roster after every change.

use crate::models::{
    AdminId, BracketError, HistoryAction, MatchHistory, MatchId, Player, PlayerId, StatLine,
    Team, TeamId,
};
use crate::store::{MatchGraphStore, TeamStore};

/// Add a team. Names are unique (case-insensitive); seeds start at 1.
pub fn add_team<S: TeamStore>(store: &mut S, name: &str, seed: u32) -> Result<TeamId, BracketError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BracketError::InvalidInput("team name is required".into()));
    }
    if seed == 0 {
        return Err(BracketError::InvalidInput("seed must be at least 1".into()));
    }
    if store.teams().iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
        return Err(BracketError::InvalidInput(format!("a team named {name:?} already exists")));
    }
    let id = store.insert_team(Team::new(name, seed));
    log::info!("Added team '{}' (seed {})", name, seed);
    Ok(id)
}

/// Remove a team and all of its players. Teams entered in a bracket cannot be removed.
pub fn remove_team<S>(store: &mut S, team_id: TeamId) -> Result<Team, BracketError>
where
    S: TeamStore + MatchGraphStore,
{
    let team = store.get_team(team_id)?;
    if let Some(bracket) = store.brackets().into_iter().find(|b| b.teams.contains(&team_id)) {
        return Err(BracketError::InvalidInput(format!(
            "team '{}' is entered in bracket '{}'",
            team.name, bracket.name
        )));
    }
    for player in store.players_of(team_id) {
        store.remove_player(player.id)?;
    }
    let team = store.remove_team(team_id)?;
    log::info!("Removed team '{}'", team.name);
    Ok(team)
}

pub fn add_player<S: TeamStore>(
    store: &mut S,
    team_id: TeamId,
    name: &str,
    character_played: &str,
) -> Result<PlayerId, BracketError> {
    add_player_with_stats(store, team_id, name, character_played, StatLine::default())
}

/// Add a player with a starting stat line.
pub fn add_player_with_stats<S: TeamStore>(
    store: &mut S,
    team_id: TeamId,
    name: &str,
    character_played: &str,
    stats: StatLine,
) -> Result<PlayerId, BracketError> {
    let (name, character_played) = (name.trim(), character_played.trim());
    if name.is_empty() || character_played.is_empty() {
        return Err(BracketError::InvalidInput(
            "player name and character played are required".into(),
        ));
    }
    store.get_team(team_id)?;
    let id = store.insert_player(Player::with_stats(team_id, name, character_played, stats));
    recompute_team_totals(store, team_id)?;
    Ok(id)
}

pub fn remove_player<S: TeamStore>(store: &mut S, player_id: PlayerId) -> Result<Player, BracketError> {
    let player = store.remove_player(player_id)?;
    recompute_team_totals(store, player.team_id)?;
    Ok(player)
}

/// Move a player to another team; both teams' totals are recomputed.
pub fn move_player<S: TeamStore>(store: &mut S, player_id: PlayerId, new_team: TeamId) -> Result<(), BracketError> {
    let mut player = store.get_player(player_id)?;
    store.get_team(new_team)?;
    let old_team = player.team_id;
    if old_team == new_team {
        return Ok(());
    }
    player.team_id = new_team;
    log::info!("Moved player '{}' to team {}", player.name, new_team);
    store.update_player(player)?;
    recompute_team_totals(store, old_team)?;
    recompute_team_totals(store, new_team)?;
    Ok(())
}

/// Overwrite a player's stat line and log it, optionally against the match it came from.
pub fn update_player_stats<S>(
    store: &mut S,
    actor: AdminId,
    player_id: PlayerId,
    stats: StatLine,
    match_id: Option<MatchId>,
) -> Result<Team, BracketError>
where
    S: TeamStore + MatchGraphStore,
{
    if let Some(id) = match_id {
        store.get_match(id)?;
    }
    let mut player = store.get_player(player_id)?;
    player.stats = stats;
    let team_id = player.team_id;
    store.update_player(player)?;
    let team = recompute_team_totals(store, team_id)?;
    store.append_history(MatchHistory::new(
        match_id,
        actor,
        HistoryAction::StatsUpdate {
            player: player_id,
            stats,
        },
    ));
    Ok(team)
}

/// Set a team's totals to the sum of its current roster. Fails with
/// [`BracketError::InvalidInput`] when the sum does not fit in a counter.
pub fn recompute_team_totals<S: TeamStore>(store: &mut S, team_id: TeamId) -> Result<Team, BracketError> {
    let mut team = store.get_team(team_id)?;
    team.recompute_totals(&store.players_of(team_id))?;
    store.update_team(team.clone())?;
    Ok(team)
}
