//! Data structures for elimination brackets: teams, players, brackets, matches, history.

mod bracket;
mod game;
mod history;
mod player;
mod team;

pub use bracket::{Bracket, BracketError, BracketId, BracketType, EntityKind};
pub use game::{
    BracketSide, GameMode, Match, MatchId, MatchScore, MatchState, Slot, BRACKET_RESET_ROUND,
    GRAND_FINALS_ROUND,
};
pub use history::{AdminId, HistoryAction, MatchHistory};
pub use player::{Player, PlayerId, StatLine};
pub use team::{Team, TeamId};
