//! Player and StatLine data structures.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in rosters and MVP/SVP picks).
pub type PlayerId = Uuid;

/// Per-game counters for one player, or the summed totals of a team.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub final_hits: u32,
    pub kos: u32,
    pub damage_taken: u32,
    pub damage_given: u32,
    pub damage_healed: u32,
}

impl StatLine {
    /// Field-wise sum, or `None` if any counter would overflow.
    pub fn checked_add(&self, rhs: &StatLine) -> Option<StatLine> {
        Some(StatLine {
            kills: self.kills.checked_add(rhs.kills)?,
            deaths: self.deaths.checked_add(rhs.deaths)?,
            assists: self.assists.checked_add(rhs.assists)?,
            final_hits: self.final_hits.checked_add(rhs.final_hits)?,
            kos: self.kos.checked_add(rhs.kos)?,
            damage_taken: self.damage_taken.checked_add(rhs.damage_taken)?,
            damage_given: self.damage_given.checked_add(rhs.damage_given)?,
            damage_healed: self.damage_healed.checked_add(rhs.damage_healed)?,
        })
    }
}

/// A player on exactly one team's roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    pub character_played: String,
    pub stats: StatLine,
}

impl Player {
    /// Create a new player on `team_id`. Stats start at zero.
    pub fn new(team_id: TeamId, name: impl Into<String>, character_played: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            name: name.into(),
            character_played: character_played.into(),
            stats: StatLine::default(),
        }
    }

    /// Same as [`Player::new`] with a starting stat line (demo rosters).
    pub fn with_stats(
        team_id: TeamId,
        name: impl Into<String>,
        character_played: impl Into<String>,
        stats: StatLine,
    ) -> Self {
        Self {
            stats,
            ..Self::new(team_id, name, character_played)
        }
    }
}
