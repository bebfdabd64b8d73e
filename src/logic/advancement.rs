//! Result recording and propagation through the match graph.
//!
//! Losers-bracket layout for a field of `P = 2^W` slots:
//!
//! - losers round 1 pairs the losers of winners round 1 (positions `2i`, `2i + 1` -> `i`);
//! - winners round `k + 1` drops its position-`i` loser into losers round `2k`, position `i`,
//!   where it meets the winner of losers round `2k - 1`, position `i`;
//! - losers round `2k + 1` pairs the winners of losers round `2k` (`2i`, `2i + 1` -> `i`);
//! - losers round `2(W - 1)` is the losers final. With `W == 1` there is no losers bracket
//!   and the loser of the only winners match goes straight to grand finals.
//!
//! Losers matches are created the first time a team is sent to them. Winners matches past
//! the ones bracket creation sets up are created once both of their feeders are decided.

use crate::logic::seeding::{first_round, FirstRoundSlot};
use crate::models::{
    Bracket, BracketError, BracketSide, BracketType, Match, MatchId, MatchState, TeamId,
    BRACKET_RESET_ROUND, GRAND_FINALS_ROUND,
};
use crate::store::MatchGraphStore;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Something that happened while recording a result, in the order it happened.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum AdvancementEvent {
    /// `loser` is None when the match was a bye.
    MatchDecided {
        match_id: MatchId,
        winner: TeamId,
        loser: Option<TeamId>,
    },
    MatchCreated {
        match_id: MatchId,
        side: BracketSide,
        round: u32,
        position: usize,
    },
    /// A winner moved on to `to`.
    TeamAdvanced { team: TeamId, from: MatchId, to: MatchId },
    /// A winners-bracket loser landed in the losers bracket.
    TeamDropped { team: TeamId, from: MatchId, to: MatchId },
    TeamEliminated { team: TeamId, by: MatchId },
    GrandFinalsCreated {
        match_id: MatchId,
        winners_champion: TeamId,
        losers_champion: TeamId,
    },
    BracketResetCreated { match_id: MatchId },
    BracketCompleted { champion: TeamId },
}

/// Record `winner` for a ready match and propagate the consequences.
///
/// Nothing is written when the result is rejected. An `InconsistentGraph` error can
/// leave partial writes behind; run this inside [`crate::store::Store::transaction`].
pub fn record_result<S: MatchGraphStore>(
    store: &mut S,
    match_id: MatchId,
    winner: TeamId,
) -> Result<Vec<AdvancementEvent>, BracketError> {
    let mut m = store.get_match(match_id)?;
    match m.state() {
        MatchState::Decided => return Err(BracketError::AlreadyDecided(match_id)),
        MatchState::Pending => {
            return Err(BracketError::InvalidResult(format!(
                "match {match_id} is still waiting for its teams"
            )))
        }
        MatchState::Ready => {}
    }
    let loser = m.opponent_of(winner).ok_or_else(|| {
        BracketError::InvalidResult(format!("team {winner} is not playing in match {match_id}"))
    })?;
    let bracket = store.get_bracket(m.bracket_id)?;

    m.winner = Some(winner);
    m.loser = Some(loser);
    store.update_match(&m)?;
    log::info!(
        "{} round {} match {} decided: {} beat {}",
        side_label(m.side),
        m.round,
        m.position,
        winner,
        loser
    );

    let mut advancer = Advancer::new(store, bracket)?;
    advancer.events.push(AdvancementEvent::MatchDecided {
        match_id,
        winner,
        loser: Some(loser),
    });
    advancer.queue.push_back(match_id);
    advancer.run()?;
    Ok(advancer.events)
}

#[derive(Clone, Copy)]
enum Edge {
    WinnersNext,
    Losers,
    LosersNext,
}

#[derive(Clone, Copy)]
enum Arrival {
    Advanced,
    Dropped,
}

struct Advancer<'s, S> {
    store: &'s mut S,
    bracket: Bracket,
    /// Which winners round-1 positions are byes.
    round_one_byes: Vec<bool>,
    events: Vec<AdvancementEvent>,
    /// Decided matches whose winner and loser still have to move on.
    queue: VecDeque<MatchId>,
}

impl<'s, S: MatchGraphStore> Advancer<'s, S> {
    fn new(store: &'s mut S, bracket: Bracket) -> Result<Self, BracketError> {
        let round_one_byes = first_round(bracket.team_count())?
            .iter()
            .map(FirstRoundSlot::is_bye)
            .collect();
        Ok(Self {
            store,
            bracket,
            round_one_byes,
            events: Vec::new(),
            queue: VecDeque::new(),
        })
    }

    fn run(&mut self) -> Result<(), BracketError> {
        while let Some(id) = self.queue.pop_front() {
            let m = self.store.get_match(id)?;
            self.advance(&m)?;
        }
        Ok(())
    }

    fn advance(&mut self, m: &Match) -> Result<(), BracketError> {
        let winner = m.winner.ok_or_else(|| {
            BracketError::InconsistentGraph(format!("match {} queued without a winner", m.id))
        })?;
        match m.side {
            BracketSide::Winners => self.advance_winners(m, winner),
            BracketSide::Losers => self.advance_losers(m, winner),
            BracketSide::GrandFinals => self.advance_grand_finals(m, winner),
        }
    }

    fn advance_winners(&mut self, m: &Match, winner: TeamId) -> Result<(), BracketError> {
        let final_round = self.bracket.winners_rounds();
        if m.round < final_round {
            self.move_winner_up(m, winner)?;
        }
        let Some(loser) = m.loser else {
            return Ok(());
        };
        match self.bracket.bracket_type {
            BracketType::Single => {
                self.eliminate(loser, m.id);
                if m.round == final_round {
                    self.complete(winner);
                }
            }
            BracketType::Double if final_round == 1 => {
                self.open_grand_finals(m.id, None, winner, loser)?;
            }
            BracketType::Double => self.drop_loser(m, loser)?,
        }
        Ok(())
    }

    fn advance_losers(&mut self, m: &Match, winner: TeamId) -> Result<(), BracketError> {
        if let Some(loser) = m.loser {
            self.eliminate(loser, m.id);
        }
        if m.round == self.bracket.losers_final_round() {
            return self.losers_champion_found(m, winner);
        }

        let round = m.round + 1;
        let position = if m.round % 2 == 1 { m.position } else { m.position / 2 };
        let target = match m.losers_next_match {
            Some(id) => self.follow(m, id, BracketSide::Losers, round)?,
            None => {
                let target = self.find_or_create(BracketSide::Losers, round, position)?;
                self.link(m.id, Edge::LosersNext, target.id)?;
                target
            }
        };
        self.place(target, winner, m.id, Arrival::Advanced)
    }

    fn advance_grand_finals(&mut self, m: &Match, winner: TeamId) -> Result<(), BracketError> {
        let loser = m.loser.ok_or_else(|| {
            BracketError::InconsistentGraph(format!("grand finals match {} has no loser", m.id))
        })?;
        if m.is_grand_finals() && m.team2 == Some(winner) {
            // The winners-bracket champion has only lost once so far.
            let mut reset = Match::new(self.bracket.id, BracketSide::GrandFinals, BRACKET_RESET_ROUND, 0)
                .with_teams(m.team1, m.team2);
            reset.game_mode = m.game_mode;
            let reset_id = self.store.create_match(reset)?;
            log::info!("Bracket reset: {} forced a second grand finals", winner);
            self.events.push(AdvancementEvent::BracketResetCreated { match_id: reset_id });
        } else if m.is_grand_finals() || m.is_bracket_reset() {
            self.eliminate(loser, m.id);
            self.complete(winner);
        } else {
            return Err(BracketError::InconsistentGraph(format!(
                "match {} is in grand finals with round {}",
                m.id, m.round
            )));
        }
        Ok(())
    }

    /// Winners-bracket winner: follow the edge, join the sibling's next match, or create
    /// the next match once the sibling is decided.
    fn move_winner_up(&mut self, m: &Match, winner: TeamId) -> Result<(), BracketError> {
        let round = m.round + 1;
        if let Some(id) = m.winners_next_match {
            let target = self.follow(m, id, BracketSide::Winners, round)?;
            return self.place(target, winner, m.id, Arrival::Advanced);
        }

        let Some(sibling) = self.find_at(BracketSide::Winners, m.round, m.position ^ 1)? else {
            // The sibling's own feeders are still being played.
            log::debug!(
                "Winner of winners round {} match {} waits for match {} to be created",
                m.round,
                m.position,
                m.position ^ 1
            );
            return Ok(());
        };
        if let Some(id) = sibling.winners_next_match {
            let target = self.follow(&sibling, id, BracketSide::Winners, round)?;
            self.link(m.id, Edge::WinnersNext, target.id)?;
            return self.place(target, winner, m.id, Arrival::Advanced);
        }
        let Some(sibling_winner) = sibling.winner else {
            log::debug!(
                "Winner of winners round {} match {} waits for match {}",
                m.round,
                m.position,
                sibling.position
            );
            return Ok(());
        };

        let position = m.position / 2;
        if self.find_at(BracketSide::Winners, round, position)?.is_some() {
            return Err(BracketError::InconsistentGraph(format!(
                "winners round {round} match {position} exists but is not linked from round {}",
                m.round
            )));
        }
        let (first, second) = if m.position < sibling.position {
            ((m.id, winner), (sibling.id, sibling_winner))
        } else {
            ((sibling.id, sibling_winner), (m.id, winner))
        };
        let next = Match::new(self.bracket.id, BracketSide::Winners, round, position)
            .with_teams(Some(first.1), Some(second.1));
        let next_id = self.store.create_match(next)?;
        self.events.push(AdvancementEvent::MatchCreated {
            match_id: next_id,
            side: BracketSide::Winners,
            round,
            position,
        });
        for (from, team) in [first, second] {
            self.link(from, Edge::WinnersNext, next_id)?;
            self.events.push(AdvancementEvent::TeamAdvanced {
                team,
                from,
                to: next_id,
            });
        }
        log::debug!("Winners round {} match {} is ready", round, position);
        Ok(())
    }

    fn drop_loser(&mut self, m: &Match, loser: TeamId) -> Result<(), BracketError> {
        let (round, position) = if m.round == 1 {
            (1, m.position / 2)
        } else {
            (2 * (m.round - 1), m.position)
        };
        let target = match m.losers_match {
            Some(id) => self.follow(m, id, BracketSide::Losers, round)?,
            None => {
                let target = self.find_or_create(BracketSide::Losers, round, position)?;
                self.link(m.id, Edge::Losers, target.id)?;
                target
            }
        };
        self.place(target, loser, m.id, Arrival::Dropped)
    }

    fn losers_champion_found(&mut self, m: &Match, champion: TeamId) -> Result<(), BracketError> {
        let final_round = self.bracket.winners_rounds();
        let winners_final = self
            .find_at(BracketSide::Winners, final_round, 0)?
            .ok_or_else(|| {
                BracketError::InconsistentGraph("losers final decided before the winners final exists".into())
            })?;
        let winners_champion = winners_final.winner.ok_or_else(|| {
            BracketError::InconsistentGraph("losers final decided before the winners final".into())
        })?;
        self.open_grand_finals(winners_final.id, Some(m.id), winners_champion, champion)
    }

    /// Create grand finals. `losers_final` is None when the bracket has no losers rounds.
    fn open_grand_finals(
        &mut self,
        winners_final: MatchId,
        losers_final: Option<MatchId>,
        winners_champion: TeamId,
        losers_champion: TeamId,
    ) -> Result<(), BracketError> {
        if !self
            .store
            .find_matches(self.bracket.id, GRAND_FINALS_ROUND, BracketSide::GrandFinals)
            .is_empty()
        {
            return Err(BracketError::InconsistentGraph(format!(
                "bracket {} already has grand finals",
                self.bracket.id
            )));
        }
        let grand_finals = Match::new(self.bracket.id, BracketSide::GrandFinals, GRAND_FINALS_ROUND, 0)
            .with_teams(Some(winners_champion), Some(losers_champion));
        let gf_id = self.store.create_match(grand_finals)?;

        self.link(winners_final, Edge::WinnersNext, gf_id)?;
        self.events.push(AdvancementEvent::TeamAdvanced {
            team: winners_champion,
            from: winners_final,
            to: gf_id,
        });
        match losers_final {
            Some(from) => {
                self.link(from, Edge::LosersNext, gf_id)?;
                self.events.push(AdvancementEvent::TeamAdvanced {
                    team: losers_champion,
                    from,
                    to: gf_id,
                });
            }
            None => {
                self.link(winners_final, Edge::Losers, gf_id)?;
                self.events.push(AdvancementEvent::TeamDropped {
                    team: losers_champion,
                    from: winners_final,
                    to: gf_id,
                });
            }
        }
        log::info!(
            "Grand finals: {} (winners bracket) vs {} (losers bracket)",
            winners_champion,
            losers_champion
        );
        self.events.push(AdvancementEvent::GrandFinalsCreated {
            match_id: gf_id,
            winners_champion,
            losers_champion,
        });
        Ok(())
    }

    /// Put `team` into `target`'s first empty slot; decide it as a bye when nothing else
    /// can ever arrive there.
    fn place(&mut self, mut target: Match, team: TeamId, from: MatchId, arrival: Arrival) -> Result<(), BracketError> {
        if target.state() == MatchState::Decided {
            return Err(BracketError::InconsistentGraph(format!(
                "match {} is already decided, cannot receive team {team}",
                target.id
            )));
        }
        target.fill_first_empty(team).ok_or_else(|| {
            BracketError::InconsistentGraph(format!("match {} has no free slot for team {team}", target.id))
        })?;

        let to = target.id;
        self.events.push(match arrival {
            Arrival::Advanced => AdvancementEvent::TeamAdvanced { team, from, to },
            Arrival::Dropped => AdvancementEvent::TeamDropped { team, from, to },
        });

        if target.side == BracketSide::Losers
            && target.state() == MatchState::Pending
            && self.expected_entrants(&target) == 1
        {
            target.winner = Some(team);
            log::debug!(
                "Losers round {} match {} has no second entrant, {} advances",
                target.round,
                target.position,
                team
            );
            self.events.push(AdvancementEvent::MatchDecided {
                match_id: to,
                winner: team,
                loser: None,
            });
            self.queue.push_back(to);
        }
        self.store.update_match(&target)
    }

    /// How many teams a losers match will ever receive. Only the first two losers rounds
    /// can be short, because only winners round 1 has byes.
    fn expected_entrants(&self, m: &Match) -> usize {
        let bye = |position: usize| self.round_one_byes.get(position).copied().unwrap_or(false);
        let (a, b) = (2 * m.position, 2 * m.position + 1);
        match m.round {
            1 => usize::from(!bye(a)) + usize::from(!bye(b)),
            2 => 1 + usize::from(!(bye(a) && bye(b))),
            _ => 2,
        }
    }

    fn find_at(&self, side: BracketSide, round: u32, position: usize) -> Result<Option<Match>, BracketError> {
        let mut found = self
            .store
            .find_matches(self.bracket.id, round, side)
            .into_iter()
            .filter(|m| m.position == position);
        let first = found.next();
        if found.next().is_some() {
            return Err(BracketError::InconsistentGraph(format!(
                "two {} round {round} matches at position {position}",
                side_label(side)
            )));
        }
        Ok(first)
    }

    fn find_or_create(&mut self, side: BracketSide, round: u32, position: usize) -> Result<Match, BracketError> {
        if let Some(m) = self.find_at(side, round, position)? {
            return Ok(m);
        }
        let m = Match::new(self.bracket.id, side, round, position);
        self.store.create_match(m.clone())?;
        self.events.push(AdvancementEvent::MatchCreated {
            match_id: m.id,
            side,
            round,
            position,
        });
        log::debug!("Created {} round {} match {}", side_label(side), round, position);
        Ok(m)
    }

    /// Resolve an edge of `from`, checking it stays in the bracket and lands where expected.
    fn follow(&self, from: &Match, id: MatchId, side: BracketSide, round: u32) -> Result<Match, BracketError> {
        let target = self.store.get_match(id).map_err(|_| {
            BracketError::InconsistentGraph(format!("match {} points to missing match {id}", from.id))
        })?;
        if target.bracket_id != from.bracket_id || target.side != side || target.round != round {
            return Err(BracketError::InconsistentGraph(format!(
                "match {} points to {} round {} in bracket {}, expected {} round {} in bracket {}",
                from.id,
                side_label(target.side),
                target.round,
                target.bracket_id,
                side_label(side),
                round,
                from.bracket_id
            )));
        }
        Ok(target)
    }

    /// Set an outgoing edge on the stored copy of `from`.
    fn link(&mut self, from: MatchId, edge: Edge, to: MatchId) -> Result<(), BracketError> {
        let mut m = self.store.get_match(from)?;
        let slot = match edge {
            Edge::WinnersNext => &mut m.winners_next_match,
            Edge::Losers => &mut m.losers_match,
            Edge::LosersNext => &mut m.losers_next_match,
        };
        if slot.is_some_and(|existing| existing != to) {
            return Err(BracketError::InconsistentGraph(format!(
                "match {from} already has a different outgoing edge"
            )));
        }
        *slot = Some(to);
        self.store.update_match(&m)
    }

    fn eliminate(&mut self, team: TeamId, by: MatchId) {
        log::info!("Team {} eliminated", team);
        self.events.push(AdvancementEvent::TeamEliminated { team, by });
    }

    fn complete(&mut self, champion: TeamId) {
        log::info!("Bracket '{}' complete, champion {}", self.bracket.name, champion);
        self.events.push(AdvancementEvent::BracketCompleted { champion });
    }
}

fn side_label(side: BracketSide) -> &'static str {
    match side {
        BracketSide::Winners => "winners",
        BracketSide::Losers => "losers",
        BracketSide::GrandFinals => "grand finals",
    }
}
