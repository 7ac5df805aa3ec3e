//! `RandomSource` backed by the `rand` crate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::random_port::RandomSource;

pub struct RngAdapter {
    rng: StdRng,
}

impl RngAdapter {
    /// Reproducible source: the same seed yields the same series.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for RngAdapter {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
