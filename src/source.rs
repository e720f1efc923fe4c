//! Where new samples come from.
//!
//! The time-series buffer asks a [`SampleSource`] for each new sample. The
//! simulated source runs the random transition model; the census source
//! classifies a live bin inventory instead. Either can drive the same
//! buffer and controller.

use crate::generator::SampleGenerator;
use crate::random::RandomSource;
use crate::sample::FillLevelSample;
use crate::store::Dustbin;

/// Produces successive fill-level samples for a fleet of fixed size.
pub trait SampleSource {
    /// Fleet total T every produced sample adds up to.
    fn total(&self) -> u32;

    /// Produces the sample following `previous`.
    fn next_sample(&mut self, previous: &FillLevelSample) -> FillLevelSample;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn total(&self) -> u32 {
        (**self).total()
    }

    fn next_sample(&mut self, previous: &FillLevelSample) -> FillLevelSample {
        (**self).next_sample(previous)
    }
}

/// Random transition model.
#[derive(Debug, Clone)]
pub struct SimulatedSource<R> {
    generator: SampleGenerator,
    rng: R,
}

impl<R: RandomSource> SimulatedSource<R> {
    /// Simulates a fleet of `total` bins using `rng`.
    pub fn new(total: u32, rng: R) -> Self {
        Self { generator: SampleGenerator::new(total), rng }
    }

    /// The underlying generator.
    pub fn generator(&self) -> &SampleGenerator {
        &self.generator
    }
}

impl<R: RandomSource> SampleSource for SimulatedSource<R> {
    fn total(&self) -> u32 {
        self.generator.total()
    }

    fn next_sample(&mut self, previous: &FillLevelSample) -> FillLevelSample {
        self.generator.next(previous, &mut self.rng)
    }
}

/// Classifies the bins returned by a provider on every tick.
///
/// The previous sample is ignored. Counts are repaired to the configured
/// total so a partial or oversized inventory cannot break conservation.
pub struct CensusSource<F> {
    total: u32,
    provider: F,
}

impl<F> CensusSource<F>
where
    F: FnMut() -> Vec<Dustbin>,
{
    /// Creates a census source for a fleet of `total` bins.
    pub fn new(total: u32, provider: F) -> Self {
        Self { total, provider }
    }
}

impl<F> SampleSource for CensusSource<F>
where
    F: FnMut() -> Vec<Dustbin>,
{
    fn total(&self) -> u32 {
        self.total
    }

    fn next_sample(&mut self, _previous: &FillLevelSample) -> FillLevelSample {
        let bins = (self.provider)();
        let mut sample =
            FillLevelSample::from_percentages(bins.iter().map(Dustbin::fill_percentage));
        let correction = sample.repair(self.total);
        if correction != 0 {
            crate::warn!(
                "census",
                "inventory reported {} bins for a fleet of {}; corrected by {}",
                bins.len(),
                self.total,
                correction
            );
        }
        sample
    }
}

impl<F> std::fmt::Debug for CensusSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CensusSource").field("total", &self.total).finish_non_exhaustive()
    }
}
