//! Recording results: winners advancement, losers drops, auto-byes, grand finals and reset.

use elimination_bracket_web::logic::{add_team, bracket_view, create_bracket, record_result};
use elimination_bracket_web::{
    AdvancementEvent, BracketError, BracketId, BracketSide, BracketStatus, BracketType, Match,
    MatchGraphStore, MatchState, MemoryStore, Store, TeamId, BRACKET_RESET_ROUND,
};

fn store_with_teams(n: usize) -> (MemoryStore, Vec<TeamId>) {
    let mut store = MemoryStore::new();
    let ids = (1..=n)
        .map(|seed| add_team(&mut store, &format!("Team {seed}"), seed as u32).unwrap())
        .collect();
    (store, ids)
}

fn match_at(store: &MemoryStore, bracket: BracketId, side: BracketSide, round: u32, position: usize) -> Match {
    store
        .find_matches(bracket, round, side)
        .into_iter()
        .find(|m| m.position == position)
        .unwrap_or_else(|| panic!("no {side:?} round {round} match at {position}"))
}

fn grand_finals(store: &MemoryStore, bracket: BracketId) -> Vec<Match> {
    store
        .matches_in_bracket(bracket)
        .into_iter()
        .filter(|m| m.side == BracketSide::GrandFinals)
        .collect()
}

/// Four-team double elimination played up to grand finals: seeds 1 and 2 win round 1,
/// seed 1 wins the winners final, seed 3 beats seed 4 and then loses to seed 2.
fn double_four_to_grand_finals() -> (MemoryStore, Vec<TeamId>, BracketId) {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();

    let w1 = match_at(&store, bracket, BracketSide::Winners, 1, 0);
    record_result(&mut store, w1.id, ids[0]).unwrap();
    let w2 = match_at(&store, bracket, BracketSide::Winners, 1, 1);
    record_result(&mut store, w2.id, ids[1]).unwrap();

    let l1 = match_at(&store, bracket, BracketSide::Losers, 1, 0);
    assert_eq!((l1.team1, l1.team2), (Some(ids[3]), Some(ids[2])));
    record_result(&mut store, l1.id, ids[2]).unwrap();

    let wf = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    record_result(&mut store, wf.id, ids[0]).unwrap();

    let lf = match_at(&store, bracket, BracketSide::Losers, 2, 0);
    assert_eq!((lf.team1, lf.team2), (Some(ids[2]), Some(ids[1])));
    let events = record_result(&mut store, lf.id, ids[1]).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, AdvancementEvent::GrandFinalsCreated { winners_champion, losers_champion, .. }
            if *winners_champion == ids[0] && *losers_champion == ids[1])));
    (store, ids, bracket)
}

#[test]
fn single_four_teams_runs_to_champion() {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Single, &ids).unwrap();

    let first = match_at(&store, bracket, BracketSide::Winners, 1, 0);
    let events = record_result(&mut store, first.id, ids[0]).unwrap();
    assert_eq!(
        events,
        vec![
            AdvancementEvent::MatchDecided {
                match_id: first.id,
                winner: ids[0],
                loser: Some(ids[3]),
            },
            AdvancementEvent::TeamEliminated {
                team: ids[3],
                by: first.id,
            },
        ]
    );
    // The final waits for the other semi.
    assert!(store.find_matches(bracket, 2, BracketSide::Winners).is_empty());

    let second = match_at(&store, bracket, BracketSide::Winners, 1, 1);
    let events = record_result(&mut store, second.id, ids[2]).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, AdvancementEvent::MatchCreated { round: 2, side: BracketSide::Winners, .. })));

    let fin = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    assert_eq!((fin.team1, fin.team2), (Some(ids[0]), Some(ids[2])));
    let refreshed_first = store.get_match(first.id).unwrap();
    assert_eq!(refreshed_first.winners_next_match, Some(fin.id));

    let events = record_result(&mut store, fin.id, ids[2]).unwrap();
    assert_eq!(
        events.last(),
        Some(&AdvancementEvent::BracketCompleted { champion: ids[2] })
    );

    let view = bracket_view(&store, bracket).unwrap();
    assert_eq!(view.status, BracketStatus::Completed { champion: ids[2] });
    let champion = view.standings.iter().find(|s| s.team_id == ids[2]).unwrap();
    assert_eq!((champion.wins, champion.losses, champion.eliminated), (2, 0, false));
    assert_eq!(view.standings.iter().filter(|s| s.eliminated).count(), 3);
}

#[test]
fn three_team_single_bye_waits_in_round_two() {
    let (mut store, ids) = store_with_teams(3);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Single, &ids).unwrap();

    let played = match_at(&store, bracket, BracketSide::Winners, 1, 1);
    let events = record_result(&mut store, played.id, ids[2]).unwrap();
    assert!(events.contains(&AdvancementEvent::TeamEliminated {
        team: ids[1],
        by: played.id,
    }));

    let fin = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    assert_eq!((fin.team1, fin.team2), (Some(ids[0]), Some(ids[2])));
    assert_eq!(fin.state(), MatchState::Ready);
}

#[test]
fn deciding_twice_is_rejected_without_changes() {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();
    let first = match_at(&store, bracket, BracketSide::Winners, 1, 0);
    record_result(&mut store, first.id, ids[0]).unwrap();
    let before = store.matches_in_bracket(bracket);

    assert_eq!(
        record_result(&mut store, first.id, ids[0]),
        Err(BracketError::AlreadyDecided(first.id))
    );
    assert_eq!(
        record_result(&mut store, first.id, ids[3]),
        Err(BracketError::AlreadyDecided(first.id))
    );
    assert_eq!(store.matches_in_bracket(bracket), before);
}

#[test]
fn winner_must_be_in_the_match() {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Single, &ids).unwrap();
    let first = match_at(&store, bracket, BracketSide::Winners, 1, 0);

    assert!(matches!(
        record_result(&mut store, first.id, ids[1]),
        Err(BracketError::InvalidResult(_))
    ));
    assert_eq!(store.get_match(first.id).unwrap().state(), MatchState::Ready);
}

#[test]
fn pending_match_cannot_be_decided() {
    let (mut store, ids) = store_with_teams(5);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Single, &ids).unwrap();
    let waiting = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    assert_eq!(waiting.state(), MatchState::Pending);

    assert!(matches!(
        record_result(&mut store, waiting.id, ids[0]),
        Err(BracketError::InvalidResult(_))
    ));
}

#[test]
fn unknown_match_is_not_found() {
    let (mut store, ids) = store_with_teams(2);
    assert!(matches!(
        record_result(&mut store, uuid::Uuid::new_v4(), ids[0]),
        Err(BracketError::NotFound { .. })
    ));
}

#[test]
fn double_four_teams_grand_finals_won_by_winners_champion() {
    let (mut store, ids, bracket) = double_four_to_grand_finals();
    let gf = grand_finals(&store, bracket);
    assert_eq!(gf.len(), 1);
    assert!(gf[0].is_grand_finals());
    assert_eq!((gf[0].team1, gf[0].team2), (Some(ids[0]), Some(ids[1])));

    let wf = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    let lf = match_at(&store, bracket, BracketSide::Losers, 2, 0);
    assert_eq!(wf.winners_next_match, Some(gf[0].id));
    assert_eq!(lf.losers_next_match, Some(gf[0].id));

    let events = record_result(&mut store, gf[0].id, ids[0]).unwrap();
    assert_eq!(
        events.last(),
        Some(&AdvancementEvent::BracketCompleted { champion: ids[0] })
    );
    assert_eq!(grand_finals(&store, bracket).len(), 1);

    let view = bracket_view(&store, bracket).unwrap();
    assert_eq!(view.status, BracketStatus::Completed { champion: ids[0] });
    let runner_up = view.standings.iter().find(|s| s.team_id == ids[1]).unwrap();
    assert_eq!(runner_up.losses, 2);
    assert!(runner_up.eliminated);
}

#[test]
fn double_four_teams_grand_finals_loss_forces_reset() {
    let (mut store, ids, bracket) = double_four_to_grand_finals();
    let gf = grand_finals(&store, bracket).remove(0);

    let events = record_result(&mut store, gf.id, ids[1]).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, AdvancementEvent::BracketResetCreated { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, AdvancementEvent::BracketCompleted { .. })));
    assert_eq!(bracket_view(&store, bracket).unwrap().status, BracketStatus::InProgress);

    let reset = match_at(&store, bracket, BracketSide::GrandFinals, BRACKET_RESET_ROUND, 0);
    assert!(reset.is_bracket_reset());
    assert_eq!((reset.team1, reset.team2), (Some(ids[0]), Some(ids[1])));
    assert_eq!(reset.state(), MatchState::Ready);

    let events = record_result(&mut store, reset.id, ids[1]).unwrap();
    assert_eq!(
        events.last(),
        Some(&AdvancementEvent::BracketCompleted { champion: ids[1] })
    );
    let view = bracket_view(&store, bracket).unwrap();
    assert_eq!(view.status, BracketStatus::Completed { champion: ids[1] });
    let top_seed = view.standings.iter().find(|s| s.team_id == ids[0]).unwrap();
    assert_eq!((top_seed.losses, top_seed.eliminated), (2, true));
}

#[test]
fn two_team_double_goes_straight_to_grand_finals() {
    let (mut store, ids) = store_with_teams(2);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();
    let only = match_at(&store, bracket, BracketSide::Winners, 1, 0);

    let events = record_result(&mut store, only.id, ids[1]).unwrap();
    assert!(!events
        .iter()
        .any(|e| matches!(e, AdvancementEvent::TeamEliminated { .. })));
    let gf = grand_finals(&store, bracket);
    assert_eq!(gf.len(), 1);
    assert_eq!((gf[0].team1, gf[0].team2), (Some(ids[1]), Some(ids[0])));
    assert_eq!(store.get_match(only.id).unwrap().losers_match, Some(gf[0].id));
}

#[test]
fn five_team_double_loser_gets_losers_bye() {
    let (mut store, ids) = store_with_teams(5);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();
    let played = match_at(&store, bracket, BracketSide::Winners, 1, 1);
    let placeholder = match_at(&store, bracket, BracketSide::Losers, 1, 0);

    let events = record_result(&mut store, played.id, ids[3]).unwrap();

    // Seed 4 joins seed 1 in round 2.
    let next = match_at(&store, bracket, BracketSide::Winners, 2, 0);
    assert_eq!((next.team1, next.team2), (Some(ids[0]), Some(ids[3])));
    assert_eq!(next.state(), MatchState::Ready);

    // Seed 5 drops, has nobody to play in losers round 1, and waits in losers round 2.
    let placeholder = store.get_match(placeholder.id).unwrap();
    assert!(placeholder.is_bye());
    assert_eq!(placeholder.winner, Some(ids[4]));
    assert!(events.contains(&AdvancementEvent::MatchDecided {
        match_id: placeholder.id,
        winner: ids[4],
        loser: None,
    }));
    let waiting = match_at(&store, bracket, BracketSide::Losers, 2, 0);
    assert_eq!((waiting.team1, waiting.team2), (Some(ids[4]), None));
    assert_eq!(placeholder.losers_next_match, Some(waiting.id));

    let drop = events
        .iter()
        .position(|e| matches!(e, AdvancementEvent::TeamDropped { team, .. } if *team == ids[4]))
        .unwrap();
    let advance = events
        .iter()
        .position(|e| matches!(e, AdvancementEvent::TeamAdvanced { team, .. } if *team == ids[3]))
        .unwrap();
    assert!(advance < drop);
}

#[test]
fn losers_round_two_with_only_one_feeder_is_a_bye() {
    // Seeds 2 and 3 both had round-1 byes, so the loser of their round-2 match has no
    // losers-bracket opponent in round 2.
    let (mut store, ids) = store_with_teams(5);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();
    let match_23 = match_at(&store, bracket, BracketSide::Winners, 2, 1);
    assert_eq!((match_23.team1, match_23.team2), (Some(ids[1]), Some(ids[2])));

    record_result(&mut store, match_23.id, ids[1]).unwrap();

    let bye = match_at(&store, bracket, BracketSide::Losers, 2, 1);
    assert!(bye.is_bye());
    assert_eq!(bye.winner, Some(ids[2]));
    let next = match_at(&store, bracket, BracketSide::Losers, 3, 0);
    assert_eq!(next.team1, Some(ids[2]));
    assert_eq!(next.state(), MatchState::Pending);
}

#[test]
fn failed_transaction_leaves_store_untouched() {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Cup", BracketType::Double, &ids).unwrap();
    let first = match_at(&store, bracket, BracketSide::Winners, 1, 0);
    let before = store.matches_in_bracket(bracket);

    let result: Result<(), BracketError> = store.transaction(|s| {
        record_result(s, first.id, ids[0])?;
        Err(BracketError::InconsistentGraph("injected".into()))
    });

    assert!(result.is_err());
    assert_eq!(store.matches_in_bracket(bracket), before);
    assert_eq!(store.get_match(first.id).unwrap().state(), MatchState::Ready);
}
