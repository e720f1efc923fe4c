//! Wall-clock sources for sample timestamps.

use chrono::{DateTime, Local, TimeDelta};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Supplies the timestamp recorded with each sample.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Local>;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Wall clock anchored once, then advanced by the tokio monotonic clock.
///
/// Never runs backwards when the system clock is adjusted, and follows
/// paused/advanced time under `tokio::time::pause`.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    anchor: DateTime<Local>,
    started: tokio::time::Instant,
}

impl RuntimeClock {
    /// Anchors at the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self::anchored_at(Local::now())
    }

    /// Anchors at `anchor`; elapsed runtime time is added on top.
    #[must_use]
    pub fn anchored_at(anchor: DateTime<Local>) -> Self {
        Self { anchor, started: tokio::time::Instant::now() }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Local> {
        self.anchor + to_delta(self.started.elapsed())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    /// Starts at `start`.
    #[must_use]
    pub fn new(start: DateTime<Local>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += to_delta(by);
    }

    /// Sets the clock to `to`, forwards or backwards.
    pub fn set(&self, to: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Local::now();
        let clock = ManualClock::new(start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now() - start, TimeDelta::seconds(10));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Local::now();
        let clock = ManualClock::new(start);
        clock.set(start - TimeDelta::seconds(5));
        assert!(clock.now() < start);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_clock_follows_paused_time() {
        let anchor = Local::now();
        let clock = RuntimeClock::anchored_at(anchor);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(clock.now() - anchor, TimeDelta::seconds(30));
    }
}
