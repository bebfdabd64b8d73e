//! Bracket and BracketError.

use crate::models::game::MatchId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// Kind of record a [`BracketError::NotFound`] refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityKind {
    Team,
    Player,
    Bracket,
    Match,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Team => "team",
            EntityKind::Player => "player",
            EntityKind::Bracket => "bracket",
            EntityKind::Match => "match",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during bracket, roster and result operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    /// Bad team count, seed, name or roster data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Bad bracket type or size at creation.
    #[error("invalid bracket: {0}")]
    InvalidBracket(String),
    /// Winner is not a participant, or the match is not ready to be decided.
    #[error("invalid result: {0}")]
    InvalidResult(String),
    /// The match already has a winner.
    #[error("match {0} already has a result")]
    AlreadyDecided(MatchId),
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },
    /// An edge points to a missing match, another bracket or the wrong round.
    #[error("inconsistent match graph: {0}")]
    InconsistentGraph(String),
    /// A writer panicked while holding the tournament state.
    #[error("tournament state lock poisoned")]
    Poisoned,
}

impl BracketError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        BracketError::NotFound { kind, id }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Single,
    Double,
}

impl FromStr for BracketType {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(BracketType::Single),
            "double" => Ok(BracketType::Double),
            other => Err(BracketError::InvalidBracket(format!(
                "unknown bracket type {other:?} (expected \"single\" or \"double\")"
            ))),
        }
    }
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BracketType::Single => "single",
            BracketType::Double => "double",
        })
    }
}

/// An elimination bracket. Its matches live in the store, keyed by `bracket_id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub name: String,
    pub bracket_type: BracketType,
    /// Entrants, strongest seed first.
    pub teams: Vec<TeamId>,
    /// Smallest power of two >= team count.
    pub size: usize,
}

impl Bracket {
    pub fn new(name: impl Into<String>, bracket_type: BracketType, teams: Vec<TeamId>, size: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bracket_type,
            teams,
            size,
        }
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Number of winners-bracket rounds (`log2(size)`).
    pub fn winners_rounds(&self) -> u32 {
        self.size.trailing_zeros()
    }

    /// Round number of the losers final; 0 when there is no losers bracket.
    pub fn losers_final_round(&self) -> u32 {
        match self.bracket_type {
            BracketType::Single => 0,
            BracketType::Double => 2 * self.winners_rounds().saturating_sub(1),
        }
    }
}
