//! Periodic tick lifecycle for a time-series window.
//!
//! The controller owns one [`TimeSeriesBuffer`] and at most one running
//! tick schedule. State machine:
//!
//! ```text
//!   Stopped --start--> Running(n) --set_interval(m)--> Running(m)
//!      ^                   |
//!      +-------stop--------+   (also on drop)
//! ```
//!
//! Every transition out of `Running` releases the old schedule before
//! anything else happens, so two schedules never overlap. The schedule
//! handle lives in a guard that aborts the task when dropped, which covers
//! early teardown as well as explicit `stop`.
//!
//! Buffered samples survive interval changes and restarts.

use crate::clock::{Clock, RuntimeClock};
use crate::error::{Error, Result};
use crate::interval::IntervalSeconds;
use crate::projection::{ChartObserver, ChartProjection, ObserverSet, SubscriptionId};
use crate::series::{label_format_or_default, TimeSeriesBuffer, TimedSample, DEFAULT_LABEL_FORMAT};
use crate::source::SampleSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const COMPONENT: &str = "controller";

/// Whether a tick schedule is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No schedule.
    Stopped,
    /// Ticking every `n` seconds.
    Running(IntervalSeconds),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the controller and its tick task.
struct Shared<S, C> {
    buffer: Mutex<TimeSeriesBuffer<S>>,
    observers: Mutex<ObserverSet>,
    label_format: Mutex<String>,
    clock: C,
    ticks: AtomicU64,
}

impl<S: SampleSource, C: Clock> Shared<S, C> {
    fn tick(&self) {
        let projection = {
            let format = lock(&self.label_format).clone();
            let mut buffer = lock(&self.buffer);
            let entry = buffer.append(self.clock.now());
            crate::trace!(COMPONENT, "tick at {}: {}", entry.timestamp, entry.sample);
            buffer.project_with_format(&format)
        };
        self.ticks.fetch_add(1, Ordering::Relaxed);
        lock(&self.observers).notify(&projection);
    }

    fn project(&self) -> ChartProjection {
        let format = lock(&self.label_format).clone();
        lock(&self.buffer).project_with_format(&format)
    }
}

/// Aborts the tick task when dropped.
struct TickGuard {
    handle: JoinHandle<()>,
    interval: IntervalSeconds,
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.handle.abort();
        crate::debug!(COMPONENT, "released {} schedule", self.interval);
    }
}

async fn run_schedule<S, C>(shared: Arc<Shared<S, C>>, period: Duration)
where
    S: SampleSource,
    C: Clock,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        shared.tick();
    }
}

/// Drives a [`TimeSeriesBuffer`] from a recurring timer.
pub struct IntervalController<S, C = RuntimeClock> {
    shared: Arc<Shared<S, C>>,
    runtime: Handle,
    interval: IntervalSeconds,
    schedule: Option<TickGuard>,
}

impl<S, C> IntervalController<S, C>
where
    S: SampleSource + Send + 'static,
    C: Clock + 'static,
{
    /// Creates a stopped controller on the current tokio runtime.
    ///
    /// Fails with [`Error::Runtime`] when called outside a runtime.
    pub fn new(buffer: TimeSeriesBuffer<S>, clock: C, interval: IntervalSeconds) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Self::with_runtime(buffer, clock, interval, runtime))
    }

    /// Creates a stopped controller that schedules onto `runtime`.
    pub fn with_runtime(
        buffer: TimeSeriesBuffer<S>,
        clock: C,
        interval: IntervalSeconds,
        runtime: Handle,
    ) -> Self {
        let shared = Shared {
            buffer: Mutex::new(buffer),
            observers: Mutex::new(ObserverSet::new()),
            label_format: Mutex::new(DEFAULT_LABEL_FORMAT.to_string()),
            clock,
            ticks: AtomicU64::new(0),
        };
        Self { shared: Arc::new(shared), runtime, interval, schedule: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        match &self.schedule {
            Some(guard) => ControllerState::Running(guard.interval),
            None => ControllerState::Stopped,
        }
    }

    /// Configured interval (used by the next start when stopped).
    #[must_use]
    pub fn interval(&self) -> IntervalSeconds {
        self.interval
    }

    /// Installs a schedule at the configured interval, replacing any
    /// running one.
    pub fn start(&mut self) {
        self.schedule = None;

        let period = self.interval.as_duration();
        let handle = self.runtime.spawn(run_schedule(Arc::clone(&self.shared), period));
        self.schedule = Some(TickGuard { handle, interval: self.interval });
        crate::info!(COMPONENT, "started, ticking every {}", self.interval);
    }

    /// Changes the interval.
    ///
    /// While running, the old schedule is cancelled and a new one installed;
    /// re-submitting the current value changes nothing. While stopped, the
    /// value is kept for the next [`start`](Self::start).
    pub fn set_interval(&mut self, interval: IntervalSeconds) {
        if interval == self.interval {
            return;
        }
        crate::info!(COMPONENT, "interval {} -> {}", self.interval, interval);
        self.interval = interval;
        if self.schedule.is_some() {
            self.start();
        }
    }

    /// Like [`set_interval`](Self::set_interval) for raw user text; bad
    /// input becomes [`IntervalSeconds::DEFAULT`].
    pub fn set_interval_lenient(&mut self, input: &str) {
        self.set_interval(IntervalSeconds::parse_lenient(input));
    }

    /// Cancels the schedule. Buffered samples are kept.
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            crate::info!(COMPONENT, "stopped after {} ticks", self.tick_count());
        }
    }

    /// Appends one sample immediately, outside the schedule.
    pub fn tick_now(&self) {
        self.shared.tick();
    }

    /// Changes the `strftime` format used for projection labels.
    ///
    /// A format chrono cannot render falls back to
    /// [`DEFAULT_LABEL_FORMAT`].
    pub fn set_label_format(&self, format: impl Into<String>) {
        let format = format.into();
        let format = label_format_or_default(&format).to_string();
        *lock(&self.shared.label_format) = format;
    }

    /// Registers an observer called after every tick.
    pub fn subscribe(&self, observer: impl ChartObserver + 'static) -> SubscriptionId {
        lock(&self.shared.observers).subscribe(observer)
    }

    /// Removes an observer.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.shared.observers).unsubscribe(id)
    }

    /// Current chart projection.
    #[must_use]
    pub fn project(&self) -> ChartProjection {
        self.shared.project()
    }

    /// Copy of the buffered entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TimedSample> {
        lock(&self.shared.buffer).to_vec()
    }

    /// Newest buffered entry.
    #[must_use]
    pub fn latest(&self) -> Option<TimedSample> {
        lock(&self.shared.buffer).latest().copied()
    }

    /// Ticks processed since construction.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }
}

impl<S, C> std::fmt::Debug for IntervalController<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalController")
            .field("interval", &self.interval)
            .field("running", &self.schedule.is_some())
            .field("ticks", &self.shared.ticks.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
