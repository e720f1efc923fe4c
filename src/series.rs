//! Bounded rolling window of timestamped fill-level samples.
//!
//! Key properties:
//!
//! - **Bounded**: never holds more than `window_size` entries; the oldest
//!   entry is dropped (not archived) when a new one would exceed it.
//! - **Chronological**: timestamps never decrease from oldest to newest.
//! - **Conserving**: every entry adds up to the source's fleet total.
//!
//! # Example
//!
//! ```rust,ignore
//! use binwatch::prelude::*;
//!
//! let source = SimulatedSource::new(100, SeededRandom::new(7));
//! let mut buffer = TimeSeriesBuffer::initialize(
//!     FillLevelSample::proportional(100),
//!     IntervalSeconds::DEFAULT,
//!     10,
//!     source,
//!     chrono::Local::now(),
//! )?;
//! buffer.append(chrono::Local::now());
//! assert_eq!(buffer.len(), 10);
//! ```

use crate::clock::to_delta;
use crate::error::{Error, Result};
use crate::interval::IntervalSeconds;
use crate::projection::ChartProjection;
use crate::sample::FillLevelSample;
use crate::source::SampleSource;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::collections::VecDeque;

const COMPONENT: &str = "series";

/// Default label format for chart projections (`14:05:09`).
pub const DEFAULT_LABEL_FORMAT: &str = "%H:%M:%S";

/// True if `format` is non-empty and every `strftime` specifier in it is
/// one chrono understands.
#[must_use]
pub fn is_valid_label_format(format: &str) -> bool {
    !format.trim().is_empty()
        && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// `format` if it is valid, [`DEFAULT_LABEL_FORMAT`] otherwise.
#[must_use]
pub fn label_format_or_default(format: &str) -> &str {
    if is_valid_label_format(format) {
        format
    } else {
        crate::warn!(
            COMPONENT,
            "label format {:?} rejected; using {}",
            format,
            DEFAULT_LABEL_FORMAT
        );
        DEFAULT_LABEL_FORMAT
    }
}

/// One buffered sample with the time it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedSample {
    /// When the sample was taken.
    pub timestamp: DateTime<Local>,
    /// Bucket counts at that time.
    pub sample: FillLevelSample,
}

/// Rolling window of the most recent samples.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuffer<S> {
    /// Oldest at the front.
    entries: VecDeque<TimedSample>,
    /// Maximum number of entries (never exceeded).
    window_size: usize,
    source: S,
}

impl<S: SampleSource> TimeSeriesBuffer<S> {
    /// Builds a full window of history ending at `now`.
    ///
    /// Entry 0 is the source's successor of `seed`, each later entry the
    /// successor of the one before. Timestamps are `interval` apart and the
    /// last one equals `now`.
    pub fn initialize(
        seed: FillLevelSample,
        interval: IntervalSeconds,
        window_size: usize,
        mut source: S,
        now: DateTime<Local>,
    ) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidWindow);
        }
        seed.ensure_total(source.total())?;

        let step = to_delta(interval.as_duration());
        let mut entries = VecDeque::with_capacity(window_size);
        let mut previous = seed;
        for i in 0..window_size {
            let sample = source.next_sample(&previous);
            let steps_back = (window_size - 1 - i) as i32;
            entries.push_back(TimedSample { timestamp: now - step * steps_back, sample });
            previous = sample;
        }

        crate::debug!(
            COMPONENT,
            "backfilled {} samples at {} spacing, total {}",
            window_size,
            interval,
            source.total()
        );
        Ok(Self { entries, window_size, source })
    }

    /// Generates the next sample from the newest one and pushes it.
    ///
    /// A `timestamp` earlier than the newest entry is clamped to it so the
    /// window stays chronological. Evicts the oldest entry once the window
    /// is over capacity. Returns the new entry.
    pub fn append(&mut self, timestamp: DateTime<Local>) -> TimedSample {
        let (previous, timestamp) = match self.entries.back() {
            Some(last) if timestamp < last.timestamp => {
                crate::warn!(
                    COMPONENT,
                    "timestamp {} precedes newest entry {}; clamping",
                    timestamp,
                    last.timestamp
                );
                (last.sample, last.timestamp)
            }
            Some(last) => (last.sample, timestamp),
            None => (FillLevelSample::empty_fleet(self.source.total()), timestamp),
        };

        let entry = TimedSample { timestamp, sample: self.source.next_sample(&previous) };
        self.entries.push_back(entry);
        while self.entries.len() > self.window_size {
            self.entries.pop_front();
        }
        entry
    }

    /// Chart-ready view using [`DEFAULT_LABEL_FORMAT`].
    #[must_use]
    pub fn project(&self) -> ChartProjection {
        self.project_with_format(DEFAULT_LABEL_FORMAT)
    }

    /// Chart-ready view with a custom `strftime` label format.
    #[must_use]
    pub fn project_with_format(&self, label_format: &str) -> ChartProjection {
        ChartProjection::from_entries(self.entries.iter(), label_format)
    }

    /// Fleet total T.
    pub fn total(&self) -> u32 {
        self.source.total()
    }
}

impl<S> TimeSeriesBuffer<S> {
    /// Number of buffered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Newest entry.
    #[must_use]
    pub fn latest(&self) -> Option<&TimedSample> {
        self.entries.back()
    }

    /// Oldest entry.
    #[must_use]
    pub fn oldest(&self) -> Option<&TimedSample> {
        self.entries.front()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TimedSample> {
        self.entries.iter()
    }

    /// Owned copy of all entries, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<TimedSample> {
        self.entries.iter().copied().collect()
    }
}
