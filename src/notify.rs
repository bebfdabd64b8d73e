//! Off-system result announcements. Best effort: a failed notification never undoes
//! the operation that triggered it.

use crate::models::{BracketError, GameMode, MatchId, MatchScore, PlayerId, TeamId};
use crate::store::{MatchGraphStore, TeamStore};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// What gets announced about a played match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub bracket_name: String,
    pub game_mode: Option<GameMode>,
    pub team1_name: String,
    pub team2_name: String,
    pub winner_name: String,
    pub mvp: Option<String>,
    pub svp: Option<String>,
    pub score: Option<MatchScore>,
}

impl MatchSummary {
    /// Resolve names for a decided, played match.
    pub fn load<S>(store: &S, match_id: MatchId) -> Result<Self, BracketError>
    where
        S: TeamStore + MatchGraphStore,
    {
        let m = store.get_match(match_id)?;
        let bracket = store.get_bracket(m.bracket_id)?;
        let (Some(team1), Some(team2), Some(winner)) = (m.team1, m.team2, m.winner) else {
            return Err(BracketError::InvalidResult(format!(
                "match {match_id} has not been played yet"
            )));
        };
        let name_of = |id: TeamId| store.get_team(id).map(|t| t.name);
        let player_name = |id: Option<PlayerId>| -> Result<Option<String>, BracketError> {
            id.map(|id| store.get_player(id).map(|p| p.name)).transpose()
        };
        Ok(Self {
            match_id,
            bracket_name: bracket.name,
            game_mode: m.game_mode,
            team1_name: name_of(team1)?,
            team2_name: name_of(team2)?,
            winner_name: name_of(winner)?,
            mvp: player_name(m.mvp)?,
            svp: player_name(m.svp)?,
            score: m.score,
        })
    }

    /// Chat message text.
    pub fn message(&self) -> String {
        let mode = self
            .game_mode
            .map_or_else(|| "Not set".to_string(), |m| format!("{m:?}"));
        let mut text = format!(
            "🏆 **Match Result** 🏆\nBracket: {}\nGame Mode: {}\nWinner: {}\nMVP: {}\nSVP: {}\nCongratulations to the winning team!",
            self.bracket_name,
            mode,
            self.winner_name,
            self.mvp.as_deref().unwrap_or("Not assigned"),
            self.svp.as_deref().unwrap_or("Not assigned"),
        );
        match self.score {
            Some(MatchScore::RoundsWon { team1, team2 }) => {
                text.push_str(&format!("\nRounds Won: {team1} - {team2}"));
            }
            Some(MatchScore::DistancePushed { team1, team2 }) => {
                text.push_str(&format!(
                    "\nDistance Pushed:\n{}: {} meters\n{}: {} meters",
                    self.team1_name, team1, self.team2_name, team2
                ));
            }
            None => {}
        }
        text
    }
}

pub trait Notifier {
    fn notify(&self, summary: &MatchSummary) -> Result<(), NotifyError>;
}

/// Posts `{"content": ...}` to a chat webhook (Discord-compatible).
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, summary: &MatchSummary) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "content": summary.message() }))
            .send()?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(format!(
                "webhook answered {}",
                response.status()
            )));
        }
        log::info!("Posted result of match {} to webhook", summary.match_id);
        Ok(())
    }
}

