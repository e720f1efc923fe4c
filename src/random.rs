//! Random sources for the sample generator.
//!
//! The generator only needs two kinds of draws: a bounded integer for
//! transition sizes and a unit float for probability gates. Putting them
//! behind [`RandomSource`] lets tests substitute a fixed source and get a
//! fully reproducible tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random draws.
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    fn below(&mut self, upper: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn below(&mut self, upper: u32) -> u32 {
        (**self).below(upper)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn below(&mut self, upper: u32) -> u32 {
        (**self).below(upper)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

/// Reproducible pseudo-random source.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a source from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Thread-local OS-seeded source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }

    fn unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// A degenerate source pinned to one end of every range.
///
/// `Minimum` draws 0 and a unit value of 0.0, so every probability gate
/// stays shut. `Maximum` draws `upper - 1` and a unit value just under 1.0,
/// so every gate opens and every transition moves its largest amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedRandom {
    /// Always the smallest value.
    Minimum,
    /// Always the largest value.
    Maximum,
}

impl RandomSource for FixedRandom {
    fn below(&mut self, upper: u32) -> u32 {
        match self {
            Self::Minimum => 0,
            Self::Maximum => upper.saturating_sub(1),
        }
    }

    fn unit(&mut self) -> f64 {
        match self {
            Self::Minimum => 0.0,
            Self::Maximum => 1.0 - f64::EPSILON,
        }
    }
}
