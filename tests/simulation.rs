//! Whole-bracket runs with simulated results, for every field size up to 16.

use elimination_bracket_web::logic::{
    add_team, bracket_view, create_bracket, create_demo_roster, demo_team_names, play_out,
    random_stats, simulate_winner,
};
use elimination_bracket_web::{
    AdvancementEvent, BracketStatus, BracketType, MatchGraphStore, MatchState, MemoryStore, Team,
    TeamId, TeamStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

fn store_with_teams(n: usize) -> (MemoryStore, Vec<TeamId>) {
    let mut store = MemoryStore::new();
    let ids = (1..=n)
        .map(|seed| add_team(&mut store, &format!("Team {seed}"), seed as u32).unwrap())
        .collect();
    (store, ids)
}

fn run_to_completion(n: usize, bracket_type: BracketType, seed: u64) {
    let (mut store, ids) = store_with_teams(n);
    let bracket = create_bracket(&mut store, "Sim", bracket_type, &ids).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let events = play_out(&mut store, Uuid::new_v4(), bracket, &mut rng).unwrap();

    let label = format!("{bracket_type} n = {n}");
    let view = bracket_view(&store, bracket).unwrap();
    let BracketStatus::Completed { champion } = view.status else {
        panic!("{label}: bracket did not complete");
    };
    assert!(
        view.matches.iter().all(|m| m.state() == MatchState::Decided),
        "{label}: matches left undecided"
    );

    let completed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            AdvancementEvent::BracketCompleted { champion } => Some(*champion),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![champion], "{label}");

    let still_in: Vec<_> = view.standings.iter().filter(|s| !s.eliminated).collect();
    assert_eq!(still_in.len(), 1, "{label}: exactly one team survives");
    assert_eq!(still_in[0].team_id, champion, "{label}");

    let eliminated: HashSet<TeamId> = events
        .iter()
        .filter_map(|e| match e {
            AdvancementEvent::TeamEliminated { team, .. } => Some(*team),
            _ => None,
        })
        .collect();
    assert_eq!(eliminated.len(), n - 1, "{label}");
    assert!(!eliminated.contains(&champion), "{label}");

    let played = view.matches.iter().filter(|m| m.loser.is_some()).count();
    match bracket_type {
        BracketType::Single => {
            assert_eq!(played, n - 1, "{label}");
            for s in view.standings.iter().filter(|s| s.team_id != champion) {
                assert_eq!(s.losses, 1, "{label}: {}", s.name);
            }
        }
        BracketType::Double => {
            assert!(played == 2 * n - 2 || played == 2 * n - 1, "{label}: {played} matches");
            for s in view.standings.iter().filter(|s| s.team_id != champion) {
                assert_eq!(s.losses, 2, "{label}: {}", s.name);
            }
            let champion_losses = view
                .standings
                .iter()
                .find(|s| s.team_id == champion)
                .map(|s| s.losses)
                .unwrap();
            assert!(champion_losses <= 1, "{label}");
        }
    }

    for m in &view.matches {
        for edge in [m.winners_next_match, m.losers_match, m.losers_next_match]
            .into_iter()
            .flatten()
        {
            let target = store.get_match(edge).unwrap();
            assert_eq!(target.bracket_id, bracket, "{label}: edge leaves the bracket");
        }
    }
}

#[test]
fn single_elimination_completes_for_every_size() {
    for n in 2..=16 {
        run_to_completion(n, BracketType::Single, n as u64);
    }
}

#[test]
fn double_elimination_completes_for_every_size() {
    for n in 2..=16 {
        for seed in 0..4 {
            run_to_completion(n, BracketType::Double, 100 * n as u64 + seed);
        }
    }
}

#[test]
fn play_out_on_finished_bracket_does_nothing() {
    let (mut store, ids) = store_with_teams(4);
    let bracket = create_bracket(&mut store, "Sim", BracketType::Double, &ids).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    play_out(&mut store, Uuid::new_v4(), bracket, &mut rng).unwrap();
    let before = store.matches_in_bracket(bracket);

    assert!(play_out(&mut store, Uuid::new_v4(), bracket, &mut rng).unwrap().is_empty());
    assert_eq!(store.matches_in_bracket(bracket), before);
}

#[test]
fn stronger_seed_wins_more_often() {
    let strong = Team::new("Strong", 1);
    let weak = Team::new("Weak", 9);
    let mut rng = StdRng::seed_from_u64(42);
    let wins = (0..2000)
        .filter(|_| simulate_winner(&strong, &weak, &mut rng) == strong.id)
        .count();
    // Expected 90%.
    assert!((1700..=1900).contains(&wins), "strong seed won {wins} of 2000");
}

#[test]
fn random_stats_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let s = random_stats(&mut rng);
        assert!((5..=20).contains(&s.kills));
        assert!((2..=15).contains(&s.deaths));
        assert!((3..=18).contains(&s.assists));
        assert!((10..=30).contains(&s.final_hits));
        assert!((1..=10).contains(&s.kos));
        assert!((1500..=3000).contains(&s.damage_taken));
        assert!((2000..=3500).contains(&s.damage_given));
        assert!((500..=1500).contains(&s.damage_healed));
    }
}

#[test]
fn demo_roster_has_distinct_teams_and_characters() {
    let mut store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(3);
    let ids = create_demo_roster(&mut store, 10, 6, &mut rng).unwrap();
    assert_eq!(ids.len(), 10);

    let names: HashSet<String> = demo_team_names(40).into_iter().collect();
    assert_eq!(names.len(), 40);

    for (i, id) in ids.iter().enumerate() {
        let team = store.get_team(*id).unwrap();
        assert_eq!(team.seed as usize, i + 1);
        let roster = store.players_of(*id);
        assert_eq!(roster.len(), 6);
        let characters: HashSet<_> = roster.iter().map(|p| p.character_played.clone()).collect();
        assert_eq!(characters.len(), 6);
        let kills: u32 = roster.iter().map(|p| p.stats.kills).sum();
        assert_eq!(team.totals.kills, kills);
    }
}
