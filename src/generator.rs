//! Stochastic fill-level transitions.
//!
//! Each tick moves bins between adjacent buckets as they fill up, then lets
//! collection trucks empty some of the fullest bins back to the lowest
//! bucket. Steps run sequentially: every step sees the counts left by the
//! previous one, so a bin that enters filled30 can move on to filled50 and
//! filled90 in the same tick, and can even be emptied again before the tick
//! ends.
//!
//! # Draw order
//!
//! Three amount draws for the filling steps, then for each emptying step a
//! gate draw followed by an amount draw only if the gate opened and the
//! amount is random. Keeping this order fixed is what makes a tick
//! reproducible under a seeded [`RandomSource`].

use crate::random::RandomSource;
use crate::sample::{FillBucket, FillLevelSample};

const COMPONENT: &str = "generator";

/// How many bins a transition tries to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    /// Uniform draw in `[0, bound)`.
    UpTo(u32),
    /// Always this many.
    Fixed(u32),
}

/// A bucket-to-bucket move, optionally behind a probability gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Bucket bins leave.
    pub from: FillBucket,
    /// Bucket bins arrive in.
    pub to: FillBucket,
    /// Requested move size, clamped to the source count.
    pub amount: Amount,
    /// The step fires only when a unit draw exceeds this value.
    pub gate: Option<f64>,
}

/// Filling steps, least severe first.
pub const FILLING: [Transition; 3] = [
    Transition {
        from: FillBucket::Below30,
        to: FillBucket::Filled30,
        amount: Amount::UpTo(5),
        gate: None,
    },
    Transition {
        from: FillBucket::Filled30,
        to: FillBucket::Filled50,
        amount: Amount::UpTo(4),
        gate: None,
    },
    Transition {
        from: FillBucket::Filled50,
        to: FillBucket::Filled90,
        amount: Amount::UpTo(3),
        gate: None,
    },
];

/// Emptying steps, fullest first. Collection always lands in `Below30`.
///
/// Unlike the filling caps, the emptying maxima are inclusive: `UpTo(4)`
/// draws 0..=3 and `UpTo(2)` draws 0..=1. An exclusive reading would leave
/// the filled50 step moving nothing.
pub const EMPTYING: [Transition; 3] = [
    Transition {
        from: FillBucket::Filled90,
        to: FillBucket::Below30,
        amount: Amount::UpTo(4),
        gate: Some(0.3),
    },
    Transition {
        from: FillBucket::Filled50,
        to: FillBucket::Below30,
        amount: Amount::UpTo(2),
        gate: Some(0.7),
    },
    Transition {
        from: FillBucket::Filled30,
        to: FillBucket::Below30,
        amount: Amount::Fixed(1),
        gate: Some(0.9),
    },
];

impl Transition {
    /// Applies this step to `sample`, returning the number of bins moved.
    pub fn apply<R: RandomSource>(&self, sample: &mut FillLevelSample, rng: &mut R) -> u32 {
        if let Some(threshold) = self.gate {
            if rng.unit() <= threshold {
                return 0;
            }
        }
        let requested = match self.amount {
            Amount::UpTo(bound) => rng.below(bound),
            Amount::Fixed(n) => n,
        };
        sample.transfer(self.from, self.to, requested)
    }
}

/// Produces the next fill-level distribution for a fleet of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGenerator {
    total: u32,
}

impl SampleGenerator {
    /// Creates a generator for a fleet of `total` bins.
    #[must_use]
    pub const fn new(total: u32) -> Self {
        Self { total }
    }

    /// Fleet total T this generator conserves.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Returns the sample following `previous`.
    ///
    /// The result always adds up to [`Self::total`]; drift is corrected by
    /// [`FillLevelSample::repair`] on every call.
    pub fn next<R: RandomSource>(
        &self,
        previous: &FillLevelSample,
        rng: &mut R,
    ) -> FillLevelSample {
        let mut sample = *previous;

        for step in FILLING.iter().chain(EMPTYING.iter()) {
            step.apply(&mut sample, rng);
        }

        let correction = sample.repair(self.total);
        if correction != 0 {
            crate::warn!(
                COMPONENT,
                "sample drifted from total {}; corrected by {}",
                self.total,
                correction
            );
        }
        crate::trace!(COMPONENT, "{}", sample);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SeededRandom};

    #[test]
    fn test_minimum_draws_leave_sample_unchanged() {
        let generator = SampleGenerator::new(100);
        let seed = FillLevelSample::new(0, 0, 0, 100);

        let next = generator.next(&seed, &mut FixedRandom::Minimum);
        assert_eq!(next, seed);
    }

    #[test]
    fn test_minimum_draws_leave_mixed_sample_unchanged() {
        let generator = SampleGenerator::new(100);
        let seed = FillLevelSample::new(5, 10, 10, 75);

        assert_eq!(generator.next(&seed, &mut FixedRandom::Minimum), seed);
    }

    #[test]
    fn test_maximum_draws_exact_result() {
        // fill:  below30->30 4, 30->50 3, 50->90 2  => (7, 11, 11, 71)
        // empty: 90->below 3, 50->below 1, 30->below 1 => (4, 10, 10, 76)
        let generator = SampleGenerator::new(100);
        let seed = FillLevelSample::new(5, 10, 10, 75);

        let next = generator.next(&seed, &mut FixedRandom::Maximum);
        assert_eq!(next, FillLevelSample::new(4, 10, 10, 76));
        assert_eq!(next.total(), 100);
    }

    #[test]
    fn test_steps_are_sequential() {
        // A bin entering filled30 this tick may continue to filled50 in
        // the same tick only because steps see updated counts.
        let generator = SampleGenerator::new(10);
        let seed = FillLevelSample::new(0, 0, 0, 10);

        let next = generator.next(&seed, &mut FixedRandom::Maximum);
        // 4 to filled30, 3 on to filled50, 2 on to filled90, then
        // 2 emptied from filled90, 1 from filled50, 1 from filled30.
        assert_eq!(next, FillLevelSample::new(0, 0, 0, 10));
    }

    #[test]
    fn test_transfers_clamped_on_small_fleet() {
        let generator = SampleGenerator::new(2);
        let seed = FillLevelSample::new(1, 0, 0, 1);

        let next = generator.next(&seed, &mut FixedRandom::Maximum);
        assert_eq!(next.total(), 2);
    }

    #[test]
    fn test_zero_fleet() {
        let generator = SampleGenerator::new(0);
        let next = generator.next(&FillLevelSample::default(), &mut FixedRandom::Maximum);
        assert_eq!(next, FillLevelSample::default());
    }

    #[test]
    fn test_mismatched_input_is_repaired() {
        let generator = SampleGenerator::new(100);
        let seed = FillLevelSample::new(0, 0, 0, 90);

        let next = generator.next(&seed, &mut FixedRandom::Minimum);
        assert_eq!(next, FillLevelSample::new(0, 0, 0, 100));
    }

    #[test]
    fn test_deterministic_under_seed() {
        let generator = SampleGenerator::new(830);
        let seed = FillLevelSample::proportional(830);

        let run = |s: u64| {
            let mut rng = SeededRandom::new(s);
            let mut sample = seed;
            (0..50)
                .map(|_| {
                    sample = generator.next(&sample, &mut rng);
                    sample
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_closed_gate_skips_amount_draw() {
        struct Counting {
            below_calls: usize,
        }
        impl RandomSource for Counting {
            fn below(&mut self, _upper: u32) -> u32 {
                self.below_calls += 1;
                0
            }
            fn unit(&mut self) -> f64 {
                0.0
            }
        }

        let mut rng = Counting { below_calls: 0 };
        SampleGenerator::new(100).next(&FillLevelSample::proportional(100), &mut rng);
        assert_eq!(rng.below_calls, FILLING.len());
    }

    #[test]
    fn test_emptying_lands_in_below30() {
        assert!(EMPTYING.iter().all(|t| t.to == FillBucket::Below30));
    }
}
