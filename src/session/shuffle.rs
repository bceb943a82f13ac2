//! Unbiased shuffling

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` in place. `SliceRandom::shuffle` is a Fisher–Yates pass.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Shuffled copy of `items`
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    fisher_yates(&mut copy, rng);
    copy
}
