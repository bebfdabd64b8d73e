//! Team: seeded bracket entrant with roster-derived stat totals.

use crate::models::bracket::BracketError;
use crate::models::player::{Player, StatLine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Lower is stronger. Always >= 1.
    pub seed: u32,
    /// Sum of the current roster's stat lines. Only ever set by [`Team::recompute_totals`].
    pub totals: StatLine,
}

impl Team {
    pub fn new(name: impl Into<String>, seed: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed,
            totals: StatLine::default(),
        }
    }

    /// Replace totals with the sum over `roster` (players of other teams are ignored).
    /// Totals are left untouched if any counter would overflow.
    pub fn recompute_totals<'a>(
        &mut self,
        roster: impl IntoIterator<Item = &'a Player>,
    ) -> Result<(), BracketError> {
        let id = self.id;
        let mut totals = StatLine::default();
        for player in roster.into_iter().filter(|p| p.team_id == id) {
            totals = totals.checked_add(&player.stats).ok_or_else(|| {
                BracketError::InvalidInput(format!("stat totals of team '{}' overflow", self.name))
            })?;
        }
        self.totals = totals;
        Ok(())
    }
}
