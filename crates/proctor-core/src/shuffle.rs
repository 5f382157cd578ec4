//! Randomized ordering of questions and options.

use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy of `items`, leaving the input untouched.
///
/// Uses an in-place Fisher-Yates shuffle on a fresh `Vec`, so every element
/// appears exactly once in the output.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
