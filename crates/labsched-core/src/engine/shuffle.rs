//! Roster randomization.
//!
//! The shuffler owns its randomness source so callers can pin a seed for
//! reproducible runs. Production use draws from OS entropy.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Uniform in-place Fisher-Yates shuffle driven by `rng`.
pub fn shuffle_roster<R: Rng + ?Sized>(roster: &mut [String], rng: &mut R) {
    roster.shuffle(rng);
}

/// Randomness provider for the schedule assembler.
pub struct RosterShuffler {
    rng: Box<dyn RngCore>,
}

impl RosterShuffler {
    /// Entropy-seeded shuffler.
    pub fn new() -> Self {
        Self {
            rng: Box::new(Mcg128Xsl64::from_entropy()),
        }
    }

    /// Deterministic shuffler; the same seed yields the same permutation.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Box::new(Mcg128Xsl64::seed_from_u64(seed)),
        }
    }

    /// Entropy-seeded unless a seed is given.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    /// Wrap any random source.
    pub fn with_rng<R: RngCore + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    pub fn shuffle(&mut self, roster: &mut [String]) {
        shuffle_roster(roster, &mut *self.rng);
    }
}

impl Default for RosterShuffler {
    fn default() -> Self {
        Self::new()
    }
}
