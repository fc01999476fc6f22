//! Randomness for retrigger rolls.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of dice rolls. Injected so tests can script outcomes.
pub trait RandomSource {
    /// Uniform integer in `min..=max`.
    fn roll(&mut self, min: u8, max: u8) -> u8;
}

/// Seeded small PRNG, cheap enough for the tick context.
#[derive(Clone, Debug)]
pub struct SeededRandom(SmallRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..1000 {
            let r = rng.roll(1, 6);
            assert!((1..=6).contains(&r));
        }
    }

    #[test]
    fn same_seed_same_rolls() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..32 {
            assert_eq!(a.roll(1, 10), b.roll(1, 10));
        }
    }

    #[test]
    fn degenerate_range() {
        let mut rng = SeededRandom::new(0);
        assert_eq!(rng.roll(3, 3), 3);
        assert_eq!(rng.roll(5, 2), 5);
    }
}
