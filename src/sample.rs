//! Fill-level samples and the bucket classification they are built from.
//!
//! A [`FillLevelSample`] is a census of a fixed-size bin fleet at one moment:
//! how many bins fall into each of the four [`FillBucket`]s. The four counts
//! always add up to the fleet total T.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fill-level ranges a bin is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillBucket {
    /// 90% full or more.
    Filled90,
    /// 50% to 89%.
    Filled50,
    /// 30% to 49%.
    Filled30,
    /// Under 30%.
    Below30,
}

impl FillBucket {
    /// All buckets, fullest first. This is also the series order in chart
    /// projections.
    pub const ALL: [FillBucket; 4] =
        [FillBucket::Filled90, FillBucket::Filled50, FillBucket::Filled30, FillBucket::Below30];

    /// Classifies a fill percentage.
    ///
    /// Values above 100 count as [`FillBucket::Filled90`]; negative values and
    /// NaN count as [`FillBucket::Below30`].
    #[must_use]
    pub fn classify(percent: f64) -> Self {
        if percent >= 90.0 {
            Self::Filled90
        } else if percent >= 50.0 {
            Self::Filled50
        } else if percent >= 30.0 {
            Self::Filled30
        } else {
            Self::Below30
        }
    }

    /// Human-readable series label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Filled90 => "Filled 90%+",
            Self::Filled50 => "Filled 50-89%",
            Self::Filled30 => "Filled 30-49%",
            Self::Below30 => "Below 30%",
        }
    }
}

impl fmt::Display for FillBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Largest supported fleet. Four buckets of at most this many bins each
/// still add up within `u32`.
pub const MAX_TOTAL_BINS: u32 = u32::MAX / 4;

/// Bucket counts for the whole fleet at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FillLevelSample {
    /// Bins at 90% or more.
    pub filled90: u32,
    /// Bins at 50% to 89%.
    pub filled50: u32,
    /// Bins at 30% to 49%.
    pub filled30: u32,
    /// Bins under 30%.
    pub below30: u32,
}

impl FillLevelSample {
    /// Creates a sample from raw counts.
    #[must_use]
    pub const fn new(filled90: u32, filled50: u32, filled30: u32, below30: u32) -> Self {
        Self { filled90, filled50, filled30, below30 }
    }

    /// Creates a sample and checks that it adds up to `total`.
    pub fn with_total(
        filled90: u32,
        filled50: u32,
        filled30: u32,
        below30: u32,
        total: u32,
    ) -> Result<Self> {
        let sample = Self::new(filled90, filled50, filled30, below30);
        sample.ensure_total(total)?;
        Ok(sample)
    }

    /// Every bin in the lowest bucket.
    #[must_use]
    pub const fn empty_fleet(total: u32) -> Self {
        Self::new(0, 0, 0, total)
    }

    /// Fixed proportional split of `total`: 10% / 20% / 30% with the
    /// remainder below 30%.
    #[must_use]
    pub const fn proportional(total: u32) -> Self {
        let wide = total as u64;
        let filled90 = (wide / 10) as u32;
        let filled50 = (wide / 5) as u32;
        let filled30 = (wide * 3 / 10) as u32;
        Self::new(filled90, filled50, filled30, total - filled90 - filled50 - filled30)
    }

    /// Classifies each fill percentage and counts the results.
    pub fn from_percentages<I>(percentages: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        percentages.into_iter().fold(Self::default(), |mut acc, percent| {
            *acc.count_mut(FillBucket::classify(percent)) += 1;
            acc
        })
    }

    /// Sum of all four buckets, saturating at `u32::MAX`.
    #[must_use]
    pub const fn total(&self) -> u32 {
        let sum = self.wide_total();
        if sum > u32::MAX as u64 {
            u32::MAX
        } else {
            sum as u32
        }
    }

    const fn wide_total(&self) -> u64 {
        self.filled90 as u64 + self.filled50 as u64 + self.filled30 as u64 + self.below30 as u64
    }

    /// Count for one bucket.
    #[must_use]
    pub const fn count(&self, bucket: FillBucket) -> u32 {
        match bucket {
            FillBucket::Filled90 => self.filled90,
            FillBucket::Filled50 => self.filled50,
            FillBucket::Filled30 => self.filled30,
            FillBucket::Below30 => self.below30,
        }
    }

    pub(crate) fn count_mut(&mut self, bucket: FillBucket) -> &mut u32 {
        match bucket {
            FillBucket::Filled90 => &mut self.filled90,
            FillBucket::Filled50 => &mut self.filled50,
            FillBucket::Filled30 => &mut self.filled30,
            FillBucket::Below30 => &mut self.below30,
        }
    }

    /// Counts in [`FillBucket::ALL`] order.
    #[must_use]
    pub const fn counts(&self) -> [u32; 4] {
        [self.filled90, self.filled50, self.filled30, self.below30]
    }

    /// Moves up to `amount` bins from one bucket to another.
    ///
    /// The move is clamped to what the source holds, so no bucket goes
    /// negative. Returns the number actually moved.
    pub fn transfer(&mut self, from: FillBucket, to: FillBucket, amount: u32) -> u32 {
        let moved = amount.min(self.count(from));
        *self.count_mut(from) -= moved;
        *self.count_mut(to) += moved;
        moved
    }

    /// Returns `Ok` if the buckets add up to `total`.
    pub fn ensure_total(&self, total: u32) -> Result<()> {
        let actual = self.total();
        if self.wide_total() == u64::from(total) {
            Ok(())
        } else {
            Err(Error::TotalMismatch { expected: total, actual })
        }
    }

    /// Forces the buckets to add up to `total`.
    ///
    /// The signed difference goes to `below30`. A shortfall below30 cannot
    /// absorb is drained from filled30, then filled50, then filled90.
    /// Returns the signed correction that was applied (0 when the sample
    /// already conserved the total).
    pub fn repair(&mut self, total: u32) -> i64 {
        let diff = i64::from(total) - self.wide_total() as i64;
        if diff >= 0 {
            self.below30 += diff as u32;
            return diff;
        }

        let mut excess = diff.unsigned_abs();
        for bucket in [
            FillBucket::Below30,
            FillBucket::Filled30,
            FillBucket::Filled50,
            FillBucket::Filled90,
        ] {
            let slot = self.count_mut(bucket);
            let taken = excess.min(u64::from(*slot)) as u32;
            *slot -= taken;
            excess -= u64::from(taken);
            if excess == 0 {
                break;
            }
        }
        diff
    }
}

impl fmt::Display for FillLevelSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "90%+: {}  50-89%: {}  30-49%: {}  <30%: {}",
            self.filled90, self.filled50, self.filled30, self.below30
        )
    }
}
