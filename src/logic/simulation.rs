//! Seed-weighted match simulation and demo rosters (populate tool, tests).

use crate::logic::advancement::{record_result, AdvancementEvent};
use crate::logic::records::log_result;
use crate::logic::roster::{add_player_with_stats, add_team};
use crate::models::{AdminId, BracketError, BracketId, MatchState, StatLine, Team, TeamId};
use crate::store::{MatchGraphStore, Store, TeamStore};
use rand::seq::SliceRandom;
use rand::Rng;

const TEAM_NAMES: [&str; 8] = [
    "Team Alpha",
    "Team Bravo",
    "Team Charlie",
    "Team Delta",
    "Team Echo",
    "Team Foxtrot",
    "Team Gamma",
    "Team Omega",
];

const FIRST_NAMES: [&str; 12] = [
    "John", "Jane", "Alice", "Bob", "Charlie", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack", "Karen",
];

const LAST_NAMES: [&str; 11] = [
    "Smith", "Johnson", "Brown", "Davis", "Wilson", "Miller", "Lee", "Garcia", "Taylor", "Moore", "Clark",
];

const CHARACTERS: [&str; 35] = [
    "Black Panther", "Doctor Strange", "Groot", "The Punisher", "Hela", "Iron Man", "Loki",
    "Rocket Raccoon", "Mantis", "Peni Parker", "Magneto", "Magik", "Spider-Man", "Venom",
    "Scarlet Witch", "Star-Lord", "Storm", "Luna Snow", "Hulk", "Namor", "Adam Warlock",
    "Jeff the Land Shark", "Thor", "Black Widow", "Captain America", "Cloak and Dagger", "Hawkeye",
    "Iron Fist", "Moon Knight", "Psylocke", "Squirrel Girl", "Winter Soldier", "Wolverine",
    "Mister Fantastic", "Invisible Woman",
];

/// Pick a winner: `team1` wins with probability `seed2 / (seed1 + seed2)`, so the
/// stronger (lower) seed is favoured.
pub fn simulate_winner<R: Rng + ?Sized>(team1: &Team, team2: &Team, rng: &mut R) -> TeamId {
    let (s1, s2) = (f64::from(team1.seed.max(1)), f64::from(team2.seed.max(1)));
    if rng.gen::<f64>() < s2 / (s1 + s2) {
        team1.id
    } else {
        team2.id
    }
}

pub fn random_stats<R: Rng + ?Sized>(rng: &mut R) -> StatLine {
    StatLine {
        kills: rng.gen_range(5..=20),
        deaths: rng.gen_range(2..=15),
        assists: rng.gen_range(3..=18),
        final_hits: rng.gen_range(10..=30),
        kos: rng.gen_range(1..=10),
        damage_taken: rng.gen_range(1500..=3000),
        damage_given: rng.gen_range(2000..=3500),
        damage_healed: rng.gen_range(500..=1500),
    }
}

/// `n` distinct team names: the call-sign list first, then lettered, then numbered.
pub fn demo_team_names(n: usize) -> Vec<String> {
    TEAM_NAMES
        .iter()
        .map(|s| s.to_string())
        .chain((b'A'..=b'Z').map(|c| format!("Team {}", c as char)))
        .chain((1..).map(|i| format!("Team {i}")))
        .take(n)
        .collect()
}

/// Add `num_teams` teams seeded 1..=n, each with `players_per_team` players on distinct
/// characters and random stats. Returns team ids in seed order.
pub fn create_demo_roster<S: TeamStore, R: Rng + ?Sized>(
    store: &mut S,
    num_teams: usize,
    players_per_team: usize,
    rng: &mut R,
) -> Result<Vec<TeamId>, BracketError> {
    if players_per_team > CHARACTERS.len() {
        return Err(BracketError::InvalidInput(format!(
            "at most {} players per team",
            CHARACTERS.len()
        )));
    }
    let mut characters = CHARACTERS.to_vec();
    let mut ids = Vec::with_capacity(num_teams);
    for (i, name) in demo_team_names(num_teams).iter().enumerate() {
        let seed = u32::try_from(i + 1)
            .map_err(|_| BracketError::InvalidInput("too many teams".into()))?;
        let team_id = add_team(store, name, seed)?;
        characters.shuffle(rng);
        for character in characters.iter().take(players_per_team) {
            let player_name = format!(
                "{} {}",
                FIRST_NAMES.choose(rng).copied().unwrap_or("Player"),
                LAST_NAMES.choose(rng).copied().unwrap_or("One")
            );
            add_player_with_stats(store, team_id, &player_name, character, random_stats(rng))?;
        }
        ids.push(team_id);
    }
    Ok(ids)
}

/// Decide every ready match of the bracket with [`simulate_winner`] until nothing is
/// left to play. Each result is its own transaction and is logged as `actor`.
pub fn play_out<S: Store, R: Rng + ?Sized>(
    store: &mut S,
    actor: AdminId,
    bracket_id: BracketId,
    rng: &mut R,
) -> Result<Vec<AdvancementEvent>, BracketError> {
    store.get_bracket(bracket_id)?;
    let mut events = Vec::new();
    loop {
        let ready: Vec<_> = store
            .matches_in_bracket(bracket_id)
            .into_iter()
            .filter(|m| m.state() == MatchState::Ready)
            .collect();
        if ready.is_empty() {
            return Ok(events);
        }
        for m in ready {
            let (Some(t1), Some(t2)) = (m.team1, m.team2) else { continue };
            let winner = simulate_winner(&store.get_team(t1)?, &store.get_team(t2)?, rng);
            let decided = store.transaction(|s| {
                let events = record_result(s, m.id, winner)?;
                log_result(s, actor, m.id)?;
                Ok(events)
            })?;
            events.extend(decided);
        }
    }
}
