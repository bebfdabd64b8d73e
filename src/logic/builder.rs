//! Bracket creation: round-1 matches, byes, and losers-bracket placeholders.

use crate::logic::seeding::{first_round, next_power_of_two, FirstRoundSlot};
use crate::models::{Bracket, BracketError, BracketId, BracketSide, BracketType, Match, MatchId, TeamId};
use crate::store::{MatchGraphStore, TeamStore};
use std::collections::HashSet;

/// Create a bracket from `team_ids` and populate its opening matches.
///
/// Teams are ordered by ascending seed (input order breaks ties). Seeds that get a bye
/// have a decided round-1 match with no opponent and are already placed in round 2.
/// In double elimination, a round-1 losers placeholder is created for every bye whose
/// round-1 neighbour is a played match, linked from that played match. Byes next to
/// another bye get no placeholder: no loser can ever reach it. All later
/// matches are created by [`crate::logic::record_result`] as results come in.
pub fn create_bracket<S>(
    store: &mut S,
    name: &str,
    bracket_type: BracketType,
    team_ids: &[TeamId],
) -> Result<BracketId, BracketError>
where
    S: TeamStore + MatchGraphStore,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(BracketError::InvalidInput("bracket name is required".into()));
    }
    if team_ids.len() < 2 {
        return Err(BracketError::InvalidBracket(format!(
            "need at least 2 teams, got {}",
            team_ids.len()
        )));
    }
    let mut seen = HashSet::with_capacity(team_ids.len());
    if let Some(dup) = team_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(BracketError::InvalidInput(format!("team {dup} entered twice")));
    }

    let mut teams = team_ids
        .iter()
        .map(|&id| store.get_team(id))
        .collect::<Result<Vec<_>, _>>()?;
    teams.sort_by_key(|t| t.seed);

    let n = teams.len();
    let size = next_power_of_two(n)?;
    let layout = first_round(n)?;
    let seeded: Vec<TeamId> = teams.iter().map(|t| t.id).collect();

    let bracket = Bracket::new(name, bracket_type, seeded.clone(), size);
    let bracket_id = store.create_bracket(bracket);
    log::info!(
        "Created {} elimination bracket '{}' with {} teams ({} byes)",
        bracket_type,
        name,
        n,
        size - n
    );

    let mut round_one = Vec::with_capacity(layout.len());
    for (position, slot) in layout.iter().enumerate() {
        let m = match *slot {
            FirstRoundSlot::Match(a, b) => Match::new(bracket_id, BracketSide::Winners, 1, position)
                .with_teams(Some(seeded[a - 1]), Some(seeded[b - 1])),
            FirstRoundSlot::Bye(a) => {
                let team = seeded[a - 1];
                let mut m = Match::new(bracket_id, BracketSide::Winners, 1, position)
                    .with_teams(Some(team), None);
                m.winner = Some(team);
                log::debug!("Seed {} ({}) gets a bye", a, teams[a - 1].name);
                m
            }
        };
        store.create_match(m.clone())?;
        round_one.push(m);
    }

    for bye in round_one.iter_mut().filter(|m| m.is_bye()) {
        let Some(team) = bye.winner else { continue };
        let next = fast_forward(store, bracket_id, bye.position / 2, team)?;
        bye.winners_next_match = Some(next);
        store.update_match(bye)?;
    }

    if bracket_type == BracketType::Double {
        for position in 0..round_one.len() {
            let sibling_is_bye = round_one
                .get(position ^ 1)
                .is_some_and(|s| s.is_bye());
            if round_one[position].is_bye() || !sibling_is_bye {
                continue;
            }
            let placeholder = Match::new(bracket_id, BracketSide::Losers, 1, position / 2);
            let placeholder_id = store.create_match(placeholder)?;
            round_one[position].losers_match = Some(placeholder_id);
            store.update_match(&round_one[position])?;
            log::debug!(
                "Losers round 1 placeholder at position {} for winners match {}",
                position / 2,
                position
            );
        }
    }

    Ok(bracket_id)
}

/// Place a bye team into round 2 at `position`, creating that match if needed.
fn fast_forward<S: MatchGraphStore>(
    store: &mut S,
    bracket_id: BracketId,
    position: usize,
    team: TeamId,
) -> Result<MatchId, BracketError> {
    let mut next = match store
        .find_matches(bracket_id, 2, BracketSide::Winners)
        .into_iter()
        .find(|m| m.position == position)
    {
        Some(m) => m,
        None => {
            let m = Match::new(bracket_id, BracketSide::Winners, 2, position);
            store.create_match(m.clone())?;
            m
        }
    };
    next.fill_first_empty(team).ok_or_else(|| {
        BracketError::InconsistentGraph(format!(
            "round 2 match at position {position} already has two teams"
        ))
    })?;
    store.update_match(&next)?;
    Ok(next.id)
}
