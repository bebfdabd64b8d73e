//! Append-only audit log of administrator actions on matches and rosters.

use crate::models::game::{GameMode, MatchId, MatchScore};
use crate::models::player::{PlayerId, StatLine};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the administrator performing an action.
pub type AdminId = Uuid;

/// What was done. One variant per action kind.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum HistoryAction {
    ResultRecorded { winner: TeamId, loser: TeamId },
    ScoreUpdate { score: MatchScore },
    GameModeUpdate { mode: GameMode },
    MvpSvpUpdate { mvp: Option<PlayerId>, svp: Option<PlayerId> },
    StatsUpdate { player: PlayerId, stats: StatLine },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchHistory {
    pub id: Uuid,
    /// None for roster actions not tied to a match.
    pub match_id: Option<MatchId>,
    pub admin_id: AdminId,
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
}

impl MatchHistory {
    pub fn new(match_id: Option<MatchId>, admin_id: AdminId, action: HistoryAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            admin_id,
            timestamp: Utc::now(),
            action,
        }
    }
}
