//! Read-side view of a bracket: matches, status, and per-team records.

use crate::models::{
    Bracket, BracketError, BracketId, BracketSide, BracketType, Match, MatchState, TeamId,
};
use crate::store::{MatchGraphStore, TeamStore};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum BracketStatus {
    InProgress,
    Completed { champion: TeamId },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub name: String,
    pub seed: u32,
    pub wins: u32,
    pub losses: u32,
    pub eliminated: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct BracketView {
    pub bracket: Bracket,
    /// Ordered by side, round and position.
    pub matches: Vec<Match>,
    pub status: BracketStatus,
    /// In seed order.
    pub standings: Vec<TeamStanding>,
}

/// Champion once the deciding match is played.
pub fn bracket_status(bracket: &Bracket, matches: &[Match]) -> BracketStatus {
    let decided = |m: &&Match| m.state() == MatchState::Decided;
    let champion = match bracket.bracket_type {
        BracketType::Single => matches
            .iter()
            .filter(decided)
            .find(|m| m.side == BracketSide::Winners && m.round == bracket.winners_rounds())
            .and_then(|m| m.winner),
        BracketType::Double => {
            let reset = matches.iter().filter(decided).find(|m| m.is_bracket_reset());
            let grand_finals = matches
                .iter()
                .filter(decided)
                .find(|m| m.is_grand_finals() && m.winner == m.team1);
            reset.or(grand_finals).and_then(|m| m.winner)
        }
    };
    match champion {
        Some(champion) => BracketStatus::Completed { champion },
        None => BracketStatus::InProgress,
    }
}

/// Losses a team can take before it is out.
pub fn lives(bracket_type: BracketType) -> u32 {
    match bracket_type {
        BracketType::Single => 1,
        BracketType::Double => 2,
    }
}

pub fn bracket_view<S>(store: &S, bracket_id: BracketId) -> Result<BracketView, BracketError>
where
    S: TeamStore + MatchGraphStore,
{
    let bracket = store.get_bracket(bracket_id)?;
    let matches = store.matches_in_bracket(bracket_id);
    let status = bracket_status(&bracket, &matches);
    let lives = lives(bracket.bracket_type);

    let mut standings = Vec::with_capacity(bracket.teams.len());
    for &team_id in &bracket.teams {
        let team = store.get_team(team_id)?;
        let wins = matches
            .iter()
            .filter(|m| m.winner == Some(team_id) && !m.is_bye())
            .count() as u32;
        let losses = matches.iter().filter(|m| m.loser == Some(team_id)).count() as u32;
        standings.push(TeamStanding {
            team_id,
            name: team.name,
            seed: team.seed,
            wins,
            losses,
            eliminated: losses >= lives,
        });
    }

    Ok(BracketView {
        bracket,
        matches,
        status,
        standings,
    })
}
