//! Deterministic random source
//!
//! Every fault the engine injects is decided by draws from a single
//! [`DeterministicRng`]. It is seeded once and never reseeded, and ChaCha8
//! produces the same stream on every platform, so a seed plus the sequence
//! of calls fully determines a run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded pseudo-random source driving all simulated faults
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha8Rng,
    seed: u64,
    draws: u64,
}

impl DeterministicRng {
    /// Create a random source from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Returns true with probability `p`
    ///
    /// Consumes exactly one draw regardless of `p`: a uniform `f64` in
    /// `[0, 1)` compared against `p`, so `p = 0` is never true and `p = 1`
    /// always is.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside `[0, 1]`. Configuration validation rejects
    /// such values before they reach the engine.
    pub fn bool_with_probability(&mut self, p: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&p),
            "probability must be within [0, 1], got {}",
            p
        );
        self.draws += 1;
        self.rng.random::<f64>() < p
    }

    /// Returns a uniformly distributed value in the inclusive range `[low, high]`
    ///
    /// # Panics
    ///
    /// Panics if `low > high`.
    pub fn int_in_range(&mut self, low: u64, high: u64) -> u64 {
        assert!(low <= high, "empty range [{}, {}]", low, high);
        self.draws += 1;
        self.rng.random_range(low..=high)
    }

    /// The seed this source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws serviced so far
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
