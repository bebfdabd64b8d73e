//! Match record: slots, result, mode-specific score and the bracket graph edges.

use crate::models::bracket::BracketId;
use crate::models::player::PlayerId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Round number of the grand finals match.
pub const GRAND_FINALS_ROUND: u32 = 999;
/// Round number of the bracket reset match (second grand finals).
pub const BRACKET_RESET_ROUND: u32 = 1000;

/// Which of the two team slots of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

/// Part of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
    /// Grand finals and the bracket reset.
    GrandFinals,
}

/// Lifecycle of a match. Only ever moves forward.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot still empty.
    Pending,
    /// Both teams assigned, no winner.
    Ready,
    Decided,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameMode {
    Domination,
    Convoy,
    Convergence,
}

/// Mode-specific score of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchScore {
    /// Domination.
    RoundsWon { team1: u32, team2: u32 },
    /// Convoy and Convergence, in meters.
    DistancePushed { team1: u32, team2: u32 },
}

impl MatchScore {
    /// Whether this score kind is recorded for `mode`.
    pub fn fits(&self, mode: GameMode) -> bool {
        matches!(
            (self, mode),
            (MatchScore::RoundsWon { .. }, GameMode::Domination)
                | (MatchScore::DistancePushed { .. }, GameMode::Convoy | GameMode::Convergence)
        )
    }
}

/// A single match in a bracket. Edges are ids of other matches in the same bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub bracket_id: BracketId,
    pub side: BracketSide,
    pub round: u32,
    /// Index within (side, round); siblings are `position ^ 1`.
    pub position: usize,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    /// None if not yet played.
    pub winner: Option<TeamId>,
    /// None until played, and forever for a bye.
    pub loser: Option<TeamId>,
    pub game_mode: Option<GameMode>,
    pub score: Option<MatchScore>,
    pub mvp: Option<PlayerId>,
    pub svp: Option<PlayerId>,
    pub winners_next_match: Option<MatchId>,
    pub losers_match: Option<MatchId>,
    pub losers_next_match: Option<MatchId>,
}

impl Match {
    pub fn new(bracket_id: BracketId, side: BracketSide, round: u32, position: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_id,
            side,
            round,
            position,
            team1: None,
            team2: None,
            winner: None,
            loser: None,
            game_mode: None,
            score: None,
            mvp: None,
            svp: None,
            winners_next_match: None,
            losers_match: None,
            losers_next_match: None,
        }
    }

    /// Builder-style: set both team slots.
    pub fn with_teams(mut self, team1: Option<TeamId>, team2: Option<TeamId>) -> Self {
        self.team1 = team1;
        self.team2 = team2;
        self
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            MatchState::Decided
        } else if self.team1.is_some() && self.team2.is_some() {
            MatchState::Ready
        } else {
            MatchState::Pending
        }
    }

    /// False for losers-bracket matches and for grand finals / reset.
    pub fn is_winners_bracket(&self) -> bool {
        self.side == BracketSide::Winners
    }

    pub fn is_grand_finals(&self) -> bool {
        self.side == BracketSide::GrandFinals && self.round == GRAND_FINALS_ROUND
    }

    pub fn is_bracket_reset(&self) -> bool {
        self.side == BracketSide::GrandFinals && self.round == BRACKET_RESET_ROUND
    }

    /// Decided without being played.
    pub fn is_bye(&self) -> bool {
        self.winner.is_some() && self.loser.is_none()
    }

    pub fn teams(&self) -> impl Iterator<Item = TeamId> {
        self.team1.into_iter().chain(self.team2)
    }

    pub fn slot_of(&self, team: TeamId) -> Option<Slot> {
        if self.team1 == Some(team) {
            Some(Slot::One)
        } else if self.team2 == Some(team) {
            Some(Slot::Two)
        } else {
            None
        }
    }

    /// The team in the other slot.
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        match self.slot_of(team)? {
            Slot::One => self.team2,
            Slot::Two => self.team1,
        }
    }

    /// Put `team` in the first empty slot (team1 before team2). Returns the slot used,
    /// or None when both slots are taken.
    pub fn fill_first_empty(&mut self, team: TeamId) -> Option<Slot> {
        if self.team1.is_none() {
            self.team1 = Some(team);
            Some(Slot::One)
        } else if self.team2.is_none() {
            self.team2 = Some(team);
            Some(Slot::Two)
        } else {
            None
        }
    }
}
