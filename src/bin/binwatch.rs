//! binwatch: live fill-level chart for a waste-bin fleet.
//!
//! Run: `binwatch --preset city`
//! Without a terminal: `binwatch --headless 20 --seed 42`

use anyhow::{Context, Result};
use binwatch::config::{Config, Preset};
use binwatch::interval::IntervalSeconds;
use binwatch::monitor::App;
use binwatch::series::TimeSeriesBuffer;
use binwatch::source::SimulatedSource;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fleet preset selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// 100 bins
    Overview,
    /// 830 bins
    City,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Overview => Preset::Overview,
            PresetArg::City => Preset::City,
        }
    }
}

/// binwatch: live fill-level chart for a waste-bin fleet
#[derive(Parser, Debug)]
#[command(name = "binwatch")]
#[command(version)]
#[command(about = "Simulated fill-level sampling for waste-bin fleets", long_about = None)]
struct Cli {
    /// Config file path (default: <config dir>/binwatch/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fleet size preset
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Fleet total (overrides the preset)
    #[arg(short = 't', long)]
    total_bins: Option<u32>,

    /// Samples kept in the window
    #[arg(short, long)]
    window: Option<usize>,

    /// Seconds between samples (1-60; anything else means 10)
    #[arg(short, long)]
    interval: Option<String>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log diagnostics to stderr
    #[arg(long)]
    debug: bool,

    /// Print this many simulated ticks as a table instead of opening the TUI
    #[arg(long, value_name = "TICKS")]
    headless: Option<u32>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                Config::load(path).with_context(|| format!("loading {}", path.display()))?
            }
            None => Config::load_or_default(
                dirs::config_dir().map(|p| p.join("binwatch/config.yaml")).unwrap_or_default(),
            ),
        };
        config.apply_env().context("applying BINWATCH_* overrides")?;

        if let Some(preset) = self.preset {
            config.sampler.total_bins = Preset::from(preset).total_bins();
        }
        if let Some(total) = self.total_bins {
            config.sampler.total_bins = total;
        }
        if let Some(window) = self.window {
            config.sampler.window_size = window;
        }
        if let Some(interval) = &self.interval {
            config.sampler.interval_secs = IntervalSeconds::parse_lenient(interval);
        }
        if let Some(seed) = self.seed {
            config.sampler.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        binwatch::debug::enable();
    } else {
        binwatch::debug::enable_from_env();
    }

    let config = cli.config()?;

    if let Some(ticks) = cli.headless {
        print!("{}", headless(&config, ticks)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .context("starting tokio runtime")?;
    let _guard = runtime.enter();

    let mut app = App::new(config)?;
    app.run()?;

    Ok(())
}

/// Runs `ticks` samples on simulated time and renders the final window.
fn headless(config: &Config, ticks: u32) -> Result<String> {
    let sampler = &config.sampler;
    let now = chrono::Local::now();
    let mut buffer = TimeSeriesBuffer::initialize(
        sampler.seed_sample(),
        sampler.interval_secs,
        sampler.window_size,
        SimulatedSource::new(sampler.total_bins, sampler.random()),
        now,
    )?;

    let step = chrono::TimeDelta::seconds(i64::from(sampler.interval_secs.secs()));
    for i in 1..=ticks {
        buffer.append(now + step * i as i32);
    }

    Ok(format!(
        "{} bins, every {}, {} ticks\n{}",
        sampler.total_bins,
        sampler.interval_secs,
        ticks,
        buffer.project_with_format(&config.chart.label_format)
    ))
}
