//! In-memory arena store. Used by the web binary, the populate tool and tests.

use super::{MatchGraphStore, Store, TeamStore};
use crate::models::{
    Bracket, BracketError, BracketId, BracketSide, EntityKind, Match, MatchHistory, MatchId,
    Player, PlayerId, Team, TeamId,
};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    teams: HashMap<TeamId, Team>,
    players: HashMap<PlayerId, Player>,
    brackets: HashMap<BracketId, Bracket>,
    matches: HashMap<MatchId, Match>,
    history: Vec<MatchHistory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TeamStore for MemoryStore {
    fn get_team(&self, id: TeamId) -> Result<Team, BracketError> {
        self.teams
            .get(&id)
            .cloned()
            .ok_or(BracketError::not_found(EntityKind::Team, id))
    }

    fn teams(&self) -> Vec<Team> {
        let mut teams: Vec<_> = self.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.seed.cmp(&b.seed).then_with(|| a.name.cmp(&b.name)));
        teams
    }

    fn insert_team(&mut self, team: Team) -> TeamId {
        let id = team.id;
        self.teams.insert(id, team);
        id
    }

    fn update_team(&mut self, team: Team) -> Result<(), BracketError> {
        let slot = self
            .teams
            .get_mut(&team.id)
            .ok_or(BracketError::not_found(EntityKind::Team, team.id))?;
        *slot = team;
        Ok(())
    }

    fn remove_team(&mut self, id: TeamId) -> Result<Team, BracketError> {
        self.teams
            .remove(&id)
            .ok_or(BracketError::not_found(EntityKind::Team, id))
    }

    fn get_player(&self, id: PlayerId) -> Result<Player, BracketError> {
        self.players
            .get(&id)
            .cloned()
            .ok_or(BracketError::not_found(EntityKind::Player, id))
    }

    fn players_of(&self, team: TeamId) -> Vec<Player> {
        let mut roster: Vec<_> = self
            .players
            .values()
            .filter(|p| p.team_id == team)
            .cloned()
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name));
        roster
    }

    fn insert_player(&mut self, player: Player) -> PlayerId {
        let id = player.id;
        self.players.insert(id, player);
        id
    }

    fn update_player(&mut self, player: Player) -> Result<(), BracketError> {
        let slot = self
            .players
            .get_mut(&player.id)
            .ok_or(BracketError::not_found(EntityKind::Player, player.id))?;
        *slot = player;
        Ok(())
    }

    fn remove_player(&mut self, id: PlayerId) -> Result<Player, BracketError> {
        self.players
            .remove(&id)
            .ok_or(BracketError::not_found(EntityKind::Player, id))
    }
}

impl MatchGraphStore for MemoryStore {
    fn get_bracket(&self, id: BracketId) -> Result<Bracket, BracketError> {
        self.brackets
            .get(&id)
            .cloned()
            .ok_or(BracketError::not_found(EntityKind::Bracket, id))
    }

    fn brackets(&self) -> Vec<Bracket> {
        let mut brackets: Vec<_> = self.brackets.values().cloned().collect();
        brackets.sort_by(|a, b| a.name.cmp(&b.name));
        brackets
    }

    fn create_bracket(&mut self, bracket: Bracket) -> BracketId {
        let id = bracket.id;
        self.brackets.insert(id, bracket);
        id
    }

    fn remove_bracket(&mut self, id: BracketId) -> Result<Bracket, BracketError> {
        let bracket = self
            .brackets
            .remove(&id)
            .ok_or(BracketError::not_found(EntityKind::Bracket, id))?;
        let removed: Vec<MatchId> = self
            .matches
            .values()
            .filter(|m| m.bracket_id == id)
            .map(|m| m.id)
            .collect();
        for match_id in &removed {
            self.matches.remove(match_id);
        }
        self.history
            .retain(|h| h.match_id.map_or(true, |m| !removed.contains(&m)));
        Ok(bracket)
    }

    fn get_match(&self, id: MatchId) -> Result<Match, BracketError> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(BracketError::not_found(EntityKind::Match, id))
    }

    fn find_matches(&self, bracket: BracketId, round: u32, side: BracketSide) -> Vec<Match> {
        let mut found: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.bracket_id == bracket && m.round == round && m.side == side)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.position);
        found
    }

    fn matches_in_bracket(&self, bracket: BracketId) -> Vec<Match> {
        let mut found: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.bracket_id == bracket)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.side, m.round, m.position));
        found
    }

    fn create_match(&mut self, m: Match) -> Result<MatchId, BracketError> {
        if !self.brackets.contains_key(&m.bracket_id) {
            return Err(BracketError::not_found(EntityKind::Bracket, m.bracket_id));
        }
        let id = m.id;
        self.matches.insert(id, m);
        Ok(id)
    }

    fn update_match(&mut self, m: &Match) -> Result<(), BracketError> {
        let slot = self
            .matches
            .get_mut(&m.id)
            .ok_or(BracketError::not_found(EntityKind::Match, m.id))?;
        *slot = m.clone();
        Ok(())
    }

    fn append_history(&mut self, entry: MatchHistory) {
        self.history.push(entry);
    }

    fn history_for_match(&self, id: MatchId) -> Vec<MatchHistory> {
        self.history
            .iter()
            .rev()
            .filter(|h| h.match_id == Some(id))
            .cloned()
            .collect()
    }
}

impl Store for MemoryStore {
    fn transaction<T, F>(&mut self, op: F) -> Result<T, BracketError>
    where
        F: FnOnce(&mut Self) -> Result<T, BracketError>,
    {
        let snapshot = self.clone();
        let result = op(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
