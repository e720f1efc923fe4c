//! Terminal dashboard for a sampled bin fleet.
//!
//! A ratatui front end over [`IntervalController`](crate::controller::IntervalController):
//! a status header, one braille line per fill bucket, and keys to change
//! the sampling interval while it runs.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use binwatch::config::Config;
//! use binwatch::monitor::App;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let _guard = runtime.enter();
//! let mut app = App::new(Config::load_or_default("binwatch.yaml"))?;
//! app.run()?;
//! ```

pub mod app;
pub mod chart;
pub mod input;

pub use app::{App, DashboardSource};
pub use chart::{bucket_color, FillChart};
pub use input::{Action, InputHandler};
