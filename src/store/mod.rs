//! Repository seam between the engine and whatever keeps the records.
//!
//! The engine only talks to these traits: teams and players through [`TeamStore`],
//! brackets, matches and the audit log through [`MatchGraphStore`]. [`Store::transaction`]
//! makes one engine operation all-or-nothing.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    Bracket, BracketError, BracketId, BracketSide, Match, MatchHistory, MatchId, Player, PlayerId,
    Team, TeamId,
};

pub trait TeamStore {
    fn get_team(&self, id: TeamId) -> Result<Team, BracketError>;
    /// All teams, strongest seed first.
    fn teams(&self) -> Vec<Team>;
    fn insert_team(&mut self, team: Team) -> TeamId;
    fn update_team(&mut self, team: Team) -> Result<(), BracketError>;
    /// Removes the team record only; players are the caller's concern.
    fn remove_team(&mut self, id: TeamId) -> Result<Team, BracketError>;

    fn get_player(&self, id: PlayerId) -> Result<Player, BracketError>;
    fn players_of(&self, team: TeamId) -> Vec<Player>;
    fn insert_player(&mut self, player: Player) -> PlayerId;
    fn update_player(&mut self, player: Player) -> Result<(), BracketError>;
    fn remove_player(&mut self, id: PlayerId) -> Result<Player, BracketError>;
}

pub trait MatchGraphStore {
    fn get_bracket(&self, id: BracketId) -> Result<Bracket, BracketError>;
    fn brackets(&self) -> Vec<Bracket>;
    fn create_bracket(&mut self, bracket: Bracket) -> BracketId;
    /// Removes the bracket with its matches and their history.
    fn remove_bracket(&mut self, id: BracketId) -> Result<Bracket, BracketError>;

    fn get_match(&self, id: MatchId) -> Result<Match, BracketError>;
    /// Matches of one round on one side, ordered by position.
    fn find_matches(&self, bracket: BracketId, round: u32, side: BracketSide) -> Vec<Match>;
    /// Every match of the bracket, ordered by side, round and position.
    fn matches_in_bracket(&self, bracket: BracketId) -> Vec<Match>;
    /// Fails with `NotFound` when the match's bracket does not exist.
    fn create_match(&mut self, m: Match) -> Result<MatchId, BracketError>;
    fn update_match(&mut self, m: &Match) -> Result<(), BracketError>;

    fn append_history(&mut self, entry: MatchHistory);
    /// Entries for one match, newest first.
    fn history_for_match(&self, id: MatchId) -> Vec<MatchHistory>;
}

/// A complete backing store.
pub trait Store: TeamStore + MatchGraphStore {
    /// Run `op` so that either all of its writes are kept or, on error, none are.
    fn transaction<T, F>(&mut self, op: F) -> Result<T, BracketError>
    where
        F: FnOnce(&mut Self) -> Result<T, BracketError>;
}
