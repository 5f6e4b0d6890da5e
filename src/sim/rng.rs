//! Seedable uniform sampling
//!
//! The simulation only ever asks for uniform `[0, 1)` samples; `rand` and
//! `chance` are built on top. Anything implementing [`RandomSource`] can drive
//! terrain generation and the celebration, so tests can script the draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A uniform `[0, 1)` sampler
pub trait RandomSource {
    /// Next sample in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform sample in `[min, max)`
    fn rand(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

/// Deterministic PCG-backed source
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}
