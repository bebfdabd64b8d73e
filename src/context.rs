//! Shared handle the web server and tools run operations through.
//!
//! Every mutation takes the write lock and runs inside one store transaction, so
//! concurrent callers never observe a half-advanced bracket. Notifications go out after
//! the lock is released.

use crate::logic::{self, AdvancementEvent, BracketView};
use crate::models::{
    AdminId, Bracket, BracketError, BracketId, BracketType, GameMode, Match,
    MatchHistory, MatchId, MatchScore, Player, PlayerId, StatLine, Team, TeamId,
};
use crate::notify::{MatchSummary, Notifier, NotifyError};
use crate::store::{MatchGraphStore, Store, TeamStore};
use rand::Rng;
use std::sync::RwLock;

/// What happened to the announcement of a result.
#[derive(Debug)]
pub enum NotifyOutcome {
    Sent,
    /// No notifier configured.
    Skipped,
    Failed(NotifyError),
}

pub struct TournamentContext<S> {
    store: RwLock<S>,
    notifier: Option<Box<dyn Notifier + Send + Sync>>,
}

impl<S: Store> TournamentContext<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: RwLock::new(store),
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + Send + Sync + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Run a read-only query against the store.
    pub fn read<T, F>(&self, query: F) -> Result<T, BracketError>
    where
        F: FnOnce(&S) -> Result<T, BracketError>,
    {
        let guard = self.store.read().map_err(|_| BracketError::Poisoned)?;
        query(&guard)
    }

    fn write<T, F>(&self, op: F) -> Result<T, BracketError>
    where
        F: FnOnce(&mut S) -> Result<T, BracketError>,
    {
        let mut guard = self.store.write().map_err(|_| BracketError::Poisoned)?;
        guard.transaction(op)
    }

    // Roster

    pub fn add_team(&self, name: &str, seed: u32) -> Result<TeamId, BracketError> {
        self.write(|s| logic::add_team(s, name, seed))
    }

    pub fn remove_team(&self, team_id: TeamId) -> Result<Team, BracketError> {
        self.write(|s| logic::remove_team(s, team_id))
    }

    pub fn team(&self, team_id: TeamId) -> Result<Team, BracketError> {
        self.read(|s| s.get_team(team_id))
    }

    pub fn teams(&self) -> Result<Vec<Team>, BracketError> {
        self.read(|s| Ok(s.teams()))
    }

    pub fn add_player(
        &self,
        team_id: TeamId,
        name: &str,
        character_played: &str,
    ) -> Result<PlayerId, BracketError> {
        self.write(|s| logic::add_player(s, team_id, name, character_played))
    }

    pub fn remove_player(&self, player_id: PlayerId) -> Result<Player, BracketError> {
        self.write(|s| logic::remove_player(s, player_id))
    }

    pub fn move_player(&self, player_id: PlayerId, new_team: TeamId) -> Result<(), BracketError> {
        self.write(|s| logic::move_player(s, player_id, new_team))
    }

    pub fn player(&self, player_id: PlayerId) -> Result<Player, BracketError> {
        self.read(|s| s.get_player(player_id))
    }

    pub fn players_of(&self, team_id: TeamId) -> Result<Vec<Player>, BracketError> {
        self.read(|s| {
            s.get_team(team_id)?;
            Ok(s.players_of(team_id))
        })
    }

    pub fn update_player_stats(
        &self,
        actor: AdminId,
        player_id: PlayerId,
        stats: StatLine,
        match_id: Option<MatchId>,
    ) -> Result<Team, BracketError> {
        self.write(|s| logic::update_player_stats(s, actor, player_id, stats, match_id))
    }

    // Brackets

    pub fn create_bracket(
        &self,
        name: &str,
        bracket_type: BracketType,
        team_ids: &[TeamId],
    ) -> Result<BracketId, BracketError> {
        self.write(|s| logic::create_bracket(s, name, bracket_type, team_ids))
    }

    pub fn remove_bracket(&self, bracket_id: BracketId) -> Result<Bracket, BracketError> {
        let bracket = self.write(|s| s.remove_bracket(bracket_id))?;
        log::info!("Removed bracket '{}'", bracket.name);
        Ok(bracket)
    }

    pub fn brackets(&self) -> Result<Vec<Bracket>, BracketError> {
        self.read(|s| Ok(s.brackets()))
    }

    pub fn bracket_view(&self, bracket_id: BracketId) -> Result<BracketView, BracketError> {
        self.read(|s| logic::bracket_view(s, bracket_id))
    }

    // Matches

    pub fn get_match(&self, match_id: MatchId) -> Result<Match, BracketError> {
        self.read(|s| s.get_match(match_id))
    }

    /// Decide a match, advance the bracket and log the result as `actor`.
    pub fn record_result(
        &self,
        actor: AdminId,
        match_id: MatchId,
        winner: TeamId,
    ) -> Result<Vec<AdvancementEvent>, BracketError> {
        self.write(|s| {
            let events = logic::record_result(s, match_id, winner)?;
            logic::log_result(s, actor, match_id)?;
            Ok(events)
        })
    }

    pub fn set_game_mode(&self, actor: AdminId, match_id: MatchId, mode: GameMode) -> Result<Match, BracketError> {
        self.write(|s| logic::set_game_mode(s, actor, match_id, mode))
    }

    pub fn set_score(&self, actor: AdminId, match_id: MatchId, score: MatchScore) -> Result<Match, BracketError> {
        self.write(|s| logic::set_score(s, actor, match_id, score))
    }

    /// Record MVP/SVP and announce the result. The update stands whatever the
    /// notifier does.
    pub fn set_mvp_svp(
        &self,
        actor: AdminId,
        match_id: MatchId,
        mvp: Option<PlayerId>,
        svp: Option<PlayerId>,
    ) -> Result<(Match, NotifyOutcome), BracketError> {
        let (m, summary) = self.write(|s| {
            let m = logic::set_mvp_svp(s, actor, match_id, mvp, svp)?;
            let summary = MatchSummary::load(s, match_id)?;
            Ok((m, summary))
        })?;
        let outcome = match &self.notifier {
            None => NotifyOutcome::Skipped,
            Some(notifier) => match notifier.notify(&summary) {
                Ok(()) => NotifyOutcome::Sent,
                Err(e) => {
                    log::warn!("Could not announce result of match {}: {}", match_id, e);
                    NotifyOutcome::Failed(e)
                }
            },
        };
        Ok((m, outcome))
    }

    /// Audit entries of a match, newest first.
    pub fn match_history(&self, match_id: MatchId) -> Result<Vec<MatchHistory>, BracketError> {
        self.read(|s| {
            s.get_match(match_id)?;
            Ok(s.history_for_match(match_id))
        })
    }

    /// Play out every remaining match with simulated results.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        actor: AdminId,
        bracket_id: BracketId,
        rng: &mut R,
    ) -> Result<Vec<AdvancementEvent>, BracketError> {
        let mut guard = self.store.write().map_err(|_| BracketError::Poisoned)?;
        logic::play_out(&mut *guard, actor, bracket_id, rng)
    }
}
