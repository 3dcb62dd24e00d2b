//! Randomness seam for round resolution.
//!
//! The resolver only needs two things from a random source: equal-agility
//! tie-breaks and percentage rolls for chance effects. Both go through
//! [`RoundRng`] so callers can inject a seeded generator and replay a round.
//! Tie-breaks shuffle with [`rand::seq::SliceRandom`] over the same source.

use rand::{Rng, RngCore};

/// Random source consumed by the round resolver.
pub trait RoundRng: RngCore {
    /// Uniform value in `0..bound`. Returns 0 when `bound <= 1`.
    fn below(&mut self, bound: u32) -> u32;

    /// Roll in `0..100`.
    fn percent_roll(&mut self) -> u32 {
        self.below(100)
    }

    /// True with probability `percent / 100`.
    fn chance(&mut self, percent: u32) -> bool {
        self.percent_roll() < percent
    }
}

impl<R: RngCore + ?Sized> RoundRng for R {
    fn below(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}
