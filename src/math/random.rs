//! Seeded uniform random source shared by heuristics and pattern selection

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Deterministic stream of uniform samples
///
/// Two sources created from the same seed produce the same sequence, which
/// makes every generation attempt reproducible from its seed alone.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: StdRng,
    seed: u64,
}

impl RandomSource {
    /// Create a source for `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Restart the stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Seed the current stream started from
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform sample in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform index in `0..n`, or 0 when `n` is 0
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}
