//! Per-match bookkeeping around the result: game mode, score, MVP/SVP, audit entries.

use crate::models::{
    AdminId, BracketError, GameMode, HistoryAction, Match, MatchHistory, MatchId, MatchScore,
    MatchState, PlayerId,
};
use crate::store::{MatchGraphStore, TeamStore};

pub fn set_game_mode<S: MatchGraphStore>(
    store: &mut S,
    actor: AdminId,
    match_id: MatchId,
    mode: GameMode,
) -> Result<Match, BracketError> {
    let mut m = store.get_match(match_id)?;
    if let Some(score) = m.score {
        if !score.fits(mode) {
            return Err(BracketError::InvalidInput(format!(
                "match {match_id} already has a score that does not apply to {mode:?}"
            )));
        }
    }
    m.game_mode = Some(mode);
    store.update_match(&m)?;
    store.append_history(MatchHistory::new(
        Some(match_id),
        actor,
        HistoryAction::GameModeUpdate { mode },
    ));
    Ok(m)
}

/// Record rounds won (Domination) or distance pushed (Convoy/Convergence).
pub fn set_score<S: MatchGraphStore>(
    store: &mut S,
    actor: AdminId,
    match_id: MatchId,
    score: MatchScore,
) -> Result<Match, BracketError> {
    let mut m = store.get_match(match_id)?;
    if m.state() == MatchState::Pending {
        return Err(BracketError::InvalidInput(format!(
            "match {match_id} does not have both teams yet"
        )));
    }
    if let Some(mode) = m.game_mode {
        if !score.fits(mode) {
            return Err(BracketError::InvalidInput(format!(
                "score {score:?} does not apply to {mode:?}"
            )));
        }
    }
    m.score = Some(score);
    store.update_match(&m)?;
    store.append_history(MatchHistory::new(
        Some(match_id),
        actor,
        HistoryAction::ScoreUpdate { score },
    ));
    Ok(m)
}

/// Record MVP and SVP for a played match. Both must be on one of the two teams.
pub fn set_mvp_svp<S>(
    store: &mut S,
    actor: AdminId,
    match_id: MatchId,
    mvp: Option<PlayerId>,
    svp: Option<PlayerId>,
) -> Result<Match, BracketError>
where
    S: TeamStore + MatchGraphStore,
{
    let mut m = store.get_match(match_id)?;
    if m.state() != MatchState::Decided || m.is_bye() {
        return Err(BracketError::InvalidResult(format!(
            "match {match_id} has not been played yet"
        )));
    }
    if mvp.is_some() && mvp == svp {
        return Err(BracketError::InvalidInput("MVP and SVP must be different players".into()));
    }
    for player_id in mvp.into_iter().chain(svp) {
        let player = store.get_player(player_id)?;
        if m.slot_of(player.team_id).is_none() {
            return Err(BracketError::InvalidInput(format!(
                "player '{}' did not play in match {match_id}",
                player.name
            )));
        }
    }
    m.mvp = mvp;
    m.svp = svp;
    store.update_match(&m)?;
    store.append_history(MatchHistory::new(
        Some(match_id),
        actor,
        HistoryAction::MvpSvpUpdate { mvp, svp },
    ));
    Ok(m)
}

/// Append the audit entry for a freshly recorded result.
pub fn log_result<S: MatchGraphStore>(store: &mut S, actor: AdminId, match_id: MatchId) -> Result<(), BracketError> {
    let m = store.get_match(match_id)?;
    let (Some(winner), Some(loser)) = (m.winner, m.loser) else {
        return Err(BracketError::InvalidResult(format!("match {match_id} has no result to log")));
    };
    store.append_history(MatchHistory::new(
        Some(match_id),
        actor,
        HistoryAction::ResultRecorded { winner, loser },
    ));
    Ok(())
}
