//! Deterministic RNG for the seeded tie-break.
//!
//! The same seed always yields the same sequence of choices, so a program run
//! with a seeded strategy is as reproducible as one run with the priority
//! tie-break.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct SelectionRng(SmallRng);

impl SelectionRng {
    /// Seed from a run seed and a stream number, so two strategies built from
    /// the same run seed still draw independent choices.
    pub fn new(seed: u64, stream: u64) -> Self {
        SelectionRng(SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(MIXING_CONSTANT)))
    }

    /// Choose a random element; `None` if `slice` is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
