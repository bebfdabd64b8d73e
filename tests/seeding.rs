//! Seeding: powers of two, byes and the round-1 slot layout.

use elimination_bracket_web::logic::{byes, first_round, next_power_of_two, slot_order, FirstRoundSlot};
use elimination_bracket_web::BracketError;

#[test]
fn next_power_of_two_rounds_up() {
    assert_eq!(next_power_of_two(1).unwrap(), 1);
    assert_eq!(next_power_of_two(2).unwrap(), 2);
    assert_eq!(next_power_of_two(5).unwrap(), 8);
    assert_eq!(next_power_of_two(8).unwrap(), 8);
    assert_eq!(next_power_of_two(9).unwrap(), 16);
}

#[test]
fn zero_teams_is_invalid() {
    assert!(matches!(next_power_of_two(0), Err(BracketError::InvalidInput(_))));
    assert!(matches!(byes(0), Err(BracketError::InvalidInput(_))));
}

#[test]
fn byes_fill_up_to_power_of_two() {
    assert_eq!(byes(2).unwrap(), 0);
    assert_eq!(byes(3).unwrap(), 1);
    assert_eq!(byes(5).unwrap(), 3);
    assert_eq!(byes(6).unwrap(), 2);
    assert_eq!(byes(8).unwrap(), 0);
    assert_eq!(byes(12).unwrap(), 4);
}

#[test]
fn slot_order_keeps_top_seeds_apart() {
    assert_eq!(slot_order(2), vec![1, 2]);
    assert_eq!(slot_order(4), vec![1, 4, 2, 3]);
    assert_eq!(slot_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn five_teams_give_three_byes_to_top_seeds() {
    assert_eq!(
        first_round(5).unwrap(),
        vec![
            FirstRoundSlot::Bye(1),
            FirstRoundSlot::Match(4, 5),
            FirstRoundSlot::Bye(2),
            FirstRoundSlot::Bye(3),
        ]
    );
}

#[test]
fn six_teams_pair_strongest_with_weakest() {
    assert_eq!(
        first_round(6).unwrap(),
        vec![
            FirstRoundSlot::Bye(1),
            FirstRoundSlot::Match(4, 5),
            FirstRoundSlot::Bye(2),
            FirstRoundSlot::Match(3, 6),
        ]
    );
}

#[test]
fn every_seed_placed_once_and_byes_go_to_the_top() {
    for n in 2..=32 {
        let layout = first_round(n).unwrap();
        assert_eq!(layout.len(), next_power_of_two(n).unwrap() / 2, "n = {n}");

        let mut seen: Vec<usize> = layout
            .iter()
            .flat_map(|slot| match *slot {
                FirstRoundSlot::Match(a, b) => vec![a, b],
                FirstRoundSlot::Bye(a) => vec![a],
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=n).collect::<Vec<_>>(), "n = {n}");

        let mut bye_seeds: Vec<usize> = layout
            .iter()
            .filter_map(|slot| match *slot {
                FirstRoundSlot::Bye(a) => Some(a),
                FirstRoundSlot::Match(..) => None,
            })
            .collect();
        bye_seeds.sort_unstable();
        assert_eq!(bye_seeds, (1..=byes(n).unwrap()).collect::<Vec<_>>(), "n = {n}");
    }
}

#[test]
fn byes_and_teams_fill_exactly_one_power_of_two() {
    for n in 1..=64 {
        let size = next_power_of_two(n).unwrap();
        assert!(size.is_power_of_two() && size >= n && size / 2 < n, "n = {n}");
        assert_eq!(byes(n).unwrap() + n, size, "n = {n}");
    }
}
