//! Elimination bracket organizer: library with models, bracket engine, store and notifier.

pub mod config;
pub mod context;
pub mod logic;
pub mod models;
pub mod notify;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use context::{NotifyOutcome, TournamentContext};
pub use logic::{
    bracket_view, create_bracket, record_result, AdvancementEvent, BracketStatus, BracketView,
    TeamStanding,
};
pub use models::{
    AdminId, Bracket, BracketError, BracketId, BracketSide, BracketType, GameMode,
    HistoryAction, Match, MatchHistory, MatchId, MatchScore, MatchState, Player, PlayerId, StatLine, Team, TeamId,
    BRACKET_RESET_ROUND, GRAND_FINALS_ROUND,
};
pub use notify::{MatchSummary, Notifier, NotifyError, WebhookNotifier};
pub use store::{MatchGraphStore, MemoryStore, Store, TeamStore};
