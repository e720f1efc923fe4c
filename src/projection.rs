//! Chart-shaped views of a time-series window, and the observers that
//! receive them.
//!
//! A [`ChartProjection`] is what a line-chart library wants: one label per
//! x position and one equally long data series per bucket.

use crate::sample::FillBucket;
use crate::series::{label_format_or_default, TimedSample};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Counts for one bucket across the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSeries {
    /// Which bucket.
    pub bucket: FillBucket,
    /// Legend text.
    pub label: &'static str,
    /// One count per x position.
    pub data: Vec<u32>,
}

/// Read-only, index-aligned chart data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartProjection {
    /// Display-formatted timestamps (x-axis labels).
    pub labels: Vec<String>,
    /// Raw timestamps, aligned with `labels`.
    pub timestamps: Vec<DateTime<Local>>,
    /// One series per bucket in [`FillBucket::ALL`] order.
    pub series: Vec<BucketSeries>,
}

impl ChartProjection {
    /// Builds a projection from entries ordered oldest first.
    ///
    /// An unusable `label_format` is replaced by the default format.
    pub fn from_entries<'a, I>(entries: I, label_format: &str) -> Self
    where
        I: IntoIterator<Item = &'a TimedSample>,
    {
        let label_format = label_format_or_default(label_format);
        let mut labels = Vec::new();
        let mut timestamps = Vec::new();
        let mut series: Vec<BucketSeries> = FillBucket::ALL
            .iter()
            .map(|&bucket| BucketSeries { bucket, label: bucket.label(), data: Vec::new() })
            .collect();

        for entry in entries {
            labels.push(entry.timestamp.format(label_format).to_string());
            timestamps.push(entry.timestamp);
            for (slot, count) in series.iter_mut().zip(entry.sample.counts()) {
                slot.data.push(count);
            }
        }

        Self { labels, timestamps, series }
    }

    /// Data for one bucket.
    #[must_use]
    pub fn series(&self, bucket: FillBucket) -> &[u32] {
        self.series
            .iter()
            .find(|s| s.bucket == bucket)
            .map(|s| s.data.as_slice())
            .unwrap_or(&[])
    }

    /// Number of x positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if there is nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest count in any series, for y-axis scaling.
    #[must_use]
    pub fn max_count(&self) -> u32 {
        self.series.iter().flat_map(|s| s.data.iter().copied()).max().unwrap_or(0)
    }
}

/// Plain-text table, one row per x position.
impl std::fmt::Display for ChartProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.labels.iter().map(String::len).max().unwrap_or(0).max(4);
        write!(f, "{:<width$}", "time")?;
        for series in &self.series {
            write!(f, " {:>14}", series.label)?;
        }
        writeln!(f)?;

        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{label:<width$}")?;
            for series in &self.series {
                write!(f, " {:>14}", series.data[i])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Receives a fresh projection after every buffer mutation.
pub trait ChartObserver: Send {
    /// Called with the updated projection.
    fn on_update(&mut self, projection: &ChartProjection);
}

impl<F> ChartObserver for F
where
    F: FnMut(&ChartProjection) + Send,
{
    fn on_update(&mut self, projection: &ChartProjection) {
        self(projection);
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of observers.
#[derive(Default)]
pub struct ObserverSet {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn ChartObserver>)>,
}

impl ObserverSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer; it will be notified after the ones already added.
    pub fn subscribe(&mut self, observer: impl ChartObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Number of subscribed observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notifies every observer in subscription order.
    pub fn notify(&mut self, projection: &ChartProjection) {
        for (_, observer) in &mut self.observers {
            observer.on_update(projection);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet").field("len", &self.observers.len()).finish()
    }
}
