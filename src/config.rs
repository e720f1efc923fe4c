//! Configuration for samplers and charts.
//!
//! Supports YAML configuration with precedence: CLI > ENV > file > defaults.
//!
//! ```yaml
//! version: 1
//! sampler:
//!   total_bins: 830
//!   window_size: 10
//!   interval_secs: 10
//!   seed: 42
//!   initial: proportional
//! chart:
//!   label_format: "%H:%M:%S"
//! ```

use crate::error::{Error, Result};
use crate::interval::IntervalSeconds;
use crate::random::SeededRandom;
use crate::sample::{FillLevelSample, MAX_TOTAL_BINS};
use crate::series::{is_valid_label_format, DEFAULT_LABEL_FORMAT};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

const COMPONENT: &str = "config";

/// Fleet size of the overview dashboard.
pub const OVERVIEW_TOTAL_BINS: u32 = 100;
/// Fleet size of the city-wide dashboard.
pub const CITY_TOTAL_BINS: u32 = 830;

/// How the first window of history is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialSample {
    /// Start from the fixed 10/20/30/40 split.
    #[default]
    Proportional,
    /// Start with every bin empty and let transitions spread them out.
    Backfill,
}

impl InitialSample {
    /// Seed sample for a fleet of `total` bins.
    #[must_use]
    pub fn seed(self, total: u32) -> FillLevelSample {
        match self {
            Self::Proportional => FillLevelSample::proportional(total),
            Self::Backfill => FillLevelSample::empty_fleet(total),
        }
    }
}

/// Sampler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Fleet total T.
    #[serde(default = "default_total_bins")]
    pub total_bins: u32,

    /// Number of samples kept in the window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Seconds between samples. Out-of-range or non-numeric values fall
    /// back to the default.
    #[serde(default, deserialize_with = "lenient_interval")]
    pub interval_secs: IntervalSeconds,

    /// Fixed seed for reproducible runs; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// How the initial history is seeded.
    #[serde(default)]
    pub initial: InitialSample,
}

fn default_total_bins() -> u32 {
    CITY_TOTAL_BINS
}
fn default_window_size() -> usize {
    10
}

fn lenient_interval<'de, D>(deserializer: D) -> std::result::Result<IntervalSeconds, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_yaml_ng::Value::deserialize(deserializer)?;
    let interval = match &raw {
        serde_yaml_ng::Value::Number(n) => n.as_u64().and_then(IntervalSeconds::new),
        serde_yaml_ng::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    Ok(interval.unwrap_or_else(|| {
        crate::warn!(
            COMPONENT,
            "interval_secs {:?} rejected; using {}",
            raw,
            IntervalSeconds::DEFAULT
        );
        IntervalSeconds::DEFAULT
    }))
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            total_bins: default_total_bins(),
            window_size: default_window_size(),
            interval_secs: IntervalSeconds::DEFAULT,
            seed: None,
            initial: InitialSample::default(),
        }
    }
}

impl SamplerConfig {
    /// Seed sample for the configured fleet.
    #[must_use]
    pub fn seed_sample(&self) -> FillLevelSample {
        self.initial.seed(self.total_bins)
    }

    /// Random source for the configured seed.
    #[must_use]
    pub fn random(&self) -> SeededRandom {
        self.seed.map_or_else(SeededRandom::from_entropy, SeededRandom::new)
    }
}

/// Chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// `strftime` format for x-axis labels.
    #[serde(default = "default_label_format")]
    pub label_format: String,
}

fn default_label_format() -> String {
    DEFAULT_LABEL_FORMAT.to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { label_format: default_label_format() }
    }
}

/// The two dashboard variants the sampler ships for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Small overview chart, 100 bins.
    Overview,
    /// City-wide chart, 830 bins.
    City,
}

impl Preset {
    /// Fleet size for this preset.
    #[must_use]
    pub fn total_bins(self) -> u32 {
        match self {
            Self::Overview => OVERVIEW_TOTAL_BINS,
            Self::City => CITY_TOTAL_BINS,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sampler settings.
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            sampler: SamplerConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration sized for a preset.
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        let mut config = Self::default();
        config.sampler.total_bins = preset.total_bins();
        config
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                crate::info!(COMPONENT, "{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Applies `BINWATCH_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(std::env::vars())
    }

    /// Applies `BINWATCH_*` overrides from the given variables.
    ///
    /// The interval follows the usual lenient rule; other malformed values
    /// are errors.
    pub fn apply_env_from<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "BINWATCH_TOTAL_BINS" => {
                    self.sampler.total_bins = parse_env(key.as_ref(), value)?;
                }
                "BINWATCH_WINDOW_SIZE" => {
                    self.sampler.window_size = parse_env(key.as_ref(), value)?;
                }
                "BINWATCH_INTERVAL_SECS" => {
                    self.sampler.interval_secs = IntervalSeconds::parse_lenient(value);
                }
                "BINWATCH_SEED" => self.sampler.seed = Some(parse_env(key.as_ref(), value)?),
                _ => {}
            }
        }
        self.validate()
    }

    /// Rejects settings no sampler can run with.
    pub fn validate(&self) -> Result<()> {
        if self.sampler.total_bins == 0 {
            return Err(Error::ConfigInvalid {
                key: "sampler.total_bins".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.sampler.total_bins > MAX_TOTAL_BINS {
            return Err(Error::ConfigInvalid {
                key: "sampler.total_bins".to_string(),
                message: format!("must be at most {MAX_TOTAL_BINS}"),
            });
        }
        if self.sampler.window_size == 0 {
            return Err(Error::ConfigInvalid {
                key: "sampler.window_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if !is_valid_label_format(&self.chart.label_format) {
            return Err(Error::ConfigInvalid {
                key: "chart.label_format".to_string(),
                message: format!("{:?} is not a usable strftime format", self.chart.label_format),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::ConfigInvalid {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::new();

        assert_eq!(config.version, 1);
        assert_eq!(config.sampler.total_bins, 830);
        assert_eq!(config.sampler.window_size, 10);
        assert_eq!(config.sampler.interval_secs, IntervalSeconds::DEFAULT);
        assert_eq!(config.chart.label_format, "%H:%M:%S");
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = Config::parse("version: 1").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r#"
version: 1
sampler:
  total_bins: 100
  window_size: 20
  interval_secs: 5
  seed: 42
  initial: backfill
chart:
  label_format: "%M:%S"
"#;

        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.sampler.total_bins, 100);
        assert_eq!(config.sampler.window_size, 20);
        assert_eq!(config.sampler.interval_secs.secs(), 5);
        assert_eq!(config.sampler.seed, Some(42));
        assert_eq!(config.sampler.initial, InitialSample::Backfill);
        assert_eq!(config.chart.label_format, "%M:%S");
    }

    #[test]
    fn test_out_of_range_interval_defaults() {
        let config = Config::parse("sampler:\n  interval_secs: 600\n").unwrap();
        assert_eq!(config.sampler.interval_secs, IntervalSeconds::DEFAULT);

        let config = Config::parse("sampler:\n  interval_secs: soon\n").unwrap();
        assert_eq!(config.sampler.interval_secs, IntervalSeconds::DEFAULT);

        let config = Config::parse("sampler:\n  interval_secs: \"30\"\n").unwrap();
        assert_eq!(config.sampler.interval_secs.secs(), 30);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
version: 1
sampler:
  window_size: not_a_number
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "got {err}");
        assert!(err.to_string().contains('4'), "Error should include line number");
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let err = Config::parse("sampler:\n  window_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("sampler.window_size"));
    }

    #[test]
    fn test_validate_rejects_zero_total() {
        let err = Config::parse("sampler:\n  total_bins: 0\n").unwrap_err();
        assert!(err.to_string().contains("sampler.total_bins"));
    }

    #[test]
    fn test_validate_rejects_unknown_label_specifier() {
        let err = Config::parse("chart:\n  label_format: \"%Q\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref key, .. } if key == "chart.label_format"));
    }

    #[test]
    fn test_validate_bounds_total_bins() {
        let err = Config::parse("sampler:\n  total_bins: 2000000000\n").unwrap_err();
        assert!(err.to_string().contains("sampler.total_bins"));

        let yaml = format!("sampler:\n  total_bins: {MAX_TOTAL_BINS}\n");
        let config = Config::parse(&yaml).unwrap();
        assert_eq!(config.sampler.seed_sample().total(), MAX_TOTAL_BINS);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::preset(Preset::Overview).sampler.total_bins, 100);
        assert_eq!(Config::preset(Preset::City).sampler.total_bins, 830);
    }

    #[test]
    fn test_initial_seed_modes() {
        assert_eq!(InitialSample::Proportional.seed(100), FillLevelSample::new(10, 20, 30, 40));
        assert_eq!(InitialSample::Backfill.seed(100), FillLevelSample::new(0, 0, 0, 100));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::new();
        config
            .apply_env_from([
                ("BINWATCH_TOTAL_BINS", "100"),
                ("BINWATCH_INTERVAL_SECS", "garbage"),
                ("BINWATCH_SEED", "7"),
                ("UNRELATED", "x"),
            ])
            .unwrap();

        assert_eq!(config.sampler.total_bins, 100);
        assert_eq!(config.sampler.interval_secs, IntervalSeconds::DEFAULT);
        assert_eq!(config.sampler.seed, Some(7));
    }

    #[test]
    fn test_env_override_rejects_bad_number() {
        let mut config = Config::new();
        let err = config.apply_env_from([("BINWATCH_WINDOW_SIZE", "ten")]).unwrap_err();
        assert!(err.to_string().contains("BINWATCH_WINDOW_SIZE"));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sampler:\n  total_bins: 100\n  window_size: 15").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sampler.total_bins, 100);
        assert_eq!(config.sampler.window_size, 15);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = Config::load("/nonexistent/binwatch.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn test_config_load_or_default() {
        let config = Config::load_or_default("/nonexistent/path");
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        use crate::random::RandomSource;

        let sampler = SamplerConfig { seed: Some(3), ..SamplerConfig::default() };
        assert_eq!(sampler.random().below(1000), sampler.random().below(1000));
    }
}
