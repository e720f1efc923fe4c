//! # binwatch
//!
//! Fill-level sampling for municipal waste-bin fleets.
//!
//! A fleet of T bins is summarized as four bucket counts (90%+, 50-89%,
//! 30-49%, under 30%). binwatch evolves that distribution tick by tick,
//! keeps a bounded rolling window of timestamped samples, and projects the
//! window into the label-plus-series shape line-chart libraries consume.
//!
//! ## Features
//!
//! - **Conserving**: every sample adds up to the fleet total, always
//! - **Reproducible**: randomness is injected; seeded or fixed sources
//!   make every tick deterministic
//! - **Swappable input**: simulated transitions or a live bin census drive
//!   the same buffer
//! - **Leak-free timers**: the tick schedule is released on stop, on
//!   interval change, and on drop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binwatch::prelude::*;
//!
//! let config = Config::preset(Preset::City);
//! let source = SimulatedSource::new(config.sampler.total_bins, config.sampler.random());
//! let buffer = TimeSeriesBuffer::initialize(
//!     config.sampler.seed_sample(),
//!     config.sampler.interval_secs,
//!     config.sampler.window_size,
//!     source,
//!     chrono::Local::now(),
//! )?;
//!
//! let interval = config.sampler.interval_secs;
//! let mut controller = IntervalController::new(buffer, RuntimeClock::new(), interval)?;
//! controller.subscribe(|chart: &ChartProjection| println!("{:?}", chart.labels));
//! controller.start();
//! ```
//!
//! ## Feature Flags
//!
//! - `monitor`: terminal dashboard and the `binwatch` binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Error Types
// ============================================================================

/// Error types for binwatch operations.
pub mod error;

pub use error::{Error, Result};

/// Diagnostic logging.
pub mod debug;

// ============================================================================
// Core Types
// ============================================================================

/// Fill buckets and fleet samples.
pub mod sample;

/// Injected randomness.
pub mod random;

/// Sampling interval.
pub mod interval;

/// Timestamp sources.
pub mod clock;

// ============================================================================
// Sampling
// ============================================================================

/// Transition model.
pub mod generator;

/// Simulated and census sample sources.
pub mod source;

/// Rolling time-series window.
pub mod series;

/// Chart projections and observers.
pub mod projection;

/// Tick schedule lifecycle.
pub mod controller;

// ============================================================================
// Application State
// ============================================================================

/// Bin records and the dustbin-info container.
pub mod store;

/// YAML configuration.
pub mod config;

/// Terminal dashboard.
#[cfg(feature = "monitor")]
#[cfg_attr(docsrs, doc(cfg(feature = "monitor")))]
pub mod monitor;

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use binwatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, RuntimeClock, SystemClock};
    pub use crate::config::{Config, InitialSample, Preset};
    pub use crate::controller::{ControllerState, IntervalController};
    pub use crate::error::{Error, Result};
    pub use crate::generator::SampleGenerator;
    pub use crate::interval::IntervalSeconds;
    pub use crate::projection::{ChartObserver, ChartProjection, SubscriptionId};
    pub use crate::random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
    pub use crate::sample::{FillBucket, FillLevelSample};
    pub use crate::series::{TimeSeriesBuffer, TimedSample};
    pub use crate::source::{CensusSource, SampleSource, SimulatedSource};
    pub use crate::store::{Dustbin, DustbinInfo, DustbinInfoStore};
}
