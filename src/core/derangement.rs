//! Derangement generation - pairs every giver with a receiver who is not themselves.
//!
//! The strategy is rejection sampling: shuffle the ids uniformly (Fisher–Yates via
//! [`SliceRandom::shuffle`]) and accept the shuffle only if no position kept its
//! original id. Conditioning a uniform permutation on "no fixed point" yields a
//! uniform derangement.
//!
//! Termination: the fraction of permutations of n ≥ 2 elements that are
//! derangements is at least 1/3 and tends to 1/e, so the expected number of
//! shuffles is at most 3 (≈ 2.718 for large n), and the chance of `max_attempts`
//! consecutive rejections is below (2/3)^`max_attempts`. The bound is still
//! explicit so a broken RNG cannot spin forever.

use crate::errors::{Error, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::hash::Hash;

/// Smallest group for which a draw is meaningful.
///
/// With two people the only derangement is the swap, so both already know who
/// they are buying for.
pub const MIN_DRAW_PARTICIPANTS: usize = 3;

/// Default upper bound on shuffles per draw.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Returns `true` if `shuffled` has no element in the same position as `original`.
#[must_use]
pub fn is_derangement<T: PartialEq>(original: &[T], shuffled: &[T]) -> bool {
    original.len() == shuffled.len() && original.iter().zip(shuffled).all(|(a, b)| a != b)
}

/// Draws a uniformly random derangement of `ids`.
///
/// Returns `(giver, receiver)` pairs in the order of `ids`. Pure: no I/O, all
/// randomness comes from `rng`.
///
/// # Errors
/// - [`Error::Validation`] if fewer than [`MIN_DRAW_PARTICIPANTS`] ids are given or
///   an id occurs twice
/// - [`Error::DrawExhausted`] if `max_attempts` shuffles were all rejected
pub fn derange<T, R>(ids: &[T], rng: &mut R, max_attempts: usize) -> Result<Vec<(T, T)>>
where
    T: Clone + Eq + Hash,
    R: Rng + ?Sized,
{
    if ids.len() < MIN_DRAW_PARTICIPANTS {
        return Err(Error::validation(format!(
            "At least {MIN_DRAW_PARTICIPANTS} participants are needed to draw names, got {}",
            ids.len()
        )));
    }

    let distinct: HashSet<&T> = ids.iter().collect();
    if distinct.len() != ids.len() {
        return Err(Error::validation("Participant list contains duplicates"));
    }

    let mut shuffled = ids.to_vec();
    for _ in 0..max_attempts {
        shuffled.shuffle(rng);
        if is_derangement(ids, &shuffled) {
            return Ok(ids.iter().cloned().zip(shuffled).collect());
        }
    }

    Err(Error::DrawExhausted {
        attempts: max_attempts,
    })
}
