//! Seeding: bye count and the standard seeded slot layout of a power-of-two field.

use crate::models::BracketError;

/// Smallest power of two >= `n`. Fails for `n == 0`.
pub fn next_power_of_two(n: usize) -> Result<usize, BracketError> {
    if n == 0 {
        return Err(BracketError::InvalidInput("team count must be at least 1".into()));
    }
    n.checked_next_power_of_two()
        .ok_or_else(|| BracketError::InvalidInput(format!("team count {n} is too large")))
}

/// Byes needed to round `n` teams up to the next power of two.
pub fn byes(n: usize) -> Result<usize, BracketError> {
    Ok(next_power_of_two(n)? - n)
}

/// Seed numbers (1-based) in bracket slot order for a field of `size` (a power of two).
///
/// Slots `2i` and `2i + 1` meet in round 1. Built by expanding `[1, 2]`, replacing each
/// seed `s` with `s, 2^k + 1 - s`, so seed 1 and seed 2 sit in opposite halves.
pub fn slot_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    let mut width = 1;
    while width < size {
        width *= 2;
        order = order
            .iter()
            .flat_map(|&s| [s, width + 1 - s])
            .collect();
    }
    order
}

/// Round-1 layout of `n` seeds: one entry per winners round-1 position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FirstRoundSlot {
    /// Two seeds play; the stronger (lower) seed is first.
    Match(usize, usize),
    /// The seed advances without playing.
    Bye(usize),
}

impl FirstRoundSlot {
    pub fn is_bye(&self) -> bool {
        matches!(self, FirstRoundSlot::Bye(_))
    }
}

/// Lay out seeds `1..=n` into round-1 positions.
///
/// The top `byes(n)` seeds get byes; the rest play strongest-remaining against
/// weakest-remaining.
pub fn first_round(n: usize) -> Result<Vec<FirstRoundSlot>, BracketError> {
    let size = next_power_of_two(n)?;
    let order = slot_order(size);
    Ok(order
        .chunks_exact(2)
        .map(|pair| {
            let (a, b) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            if b > n {
                FirstRoundSlot::Bye(a)
            } else {
                FirstRoundSlot::Match(a, b)
            }
        })
        .collect())
}
