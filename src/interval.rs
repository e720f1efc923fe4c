//! Sampling interval, in whole seconds.
//!
//! User-facing input is lenient: anything non-numeric or outside
//! `1..=60` becomes [`IntervalSeconds::DEFAULT`]. [`FromStr`] is the strict
//! variant for callers that want to reject bad input instead.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A validated sampling interval in `1..=60` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct IntervalSeconds(u32);

impl IntervalSeconds {
    /// Shortest allowed interval.
    pub const MIN: Self = Self(1);
    /// Longest allowed interval.
    pub const MAX: Self = Self(60);
    /// Fallback for missing or malformed input.
    pub const DEFAULT: Self = Self(10);

    /// Returns `Some` if `secs` is in range.
    #[must_use]
    pub fn new(secs: u64) -> Option<Self> {
        if (u64::from(Self::MIN.0)..=u64::from(Self::MAX.0)).contains(&secs) {
            Some(Self(secs as u32))
        } else {
            None
        }
    }

    /// In-range values pass through; everything else becomes the default.
    #[must_use]
    pub fn coerce(secs: u64) -> Self {
        Self::new(secs).unwrap_or(Self::DEFAULT)
    }

    /// Lenient parse of user text; never fails.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        match input.parse() {
            Ok(interval) => interval,
            Err(_) => {
                crate::debug!(
                    "interval",
                    "'{}' is not a valid interval; using {}",
                    input.trim(),
                    Self::DEFAULT
                );
                Self::DEFAULT
            }
        }
    }

    /// Seconds as an integer.
    #[must_use]
    pub const fn secs(self) -> u32 {
        self.0
    }

    /// As a [`Duration`].
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0 as u64)
    }

    /// One second longer, capped at [`Self::MAX`].
    #[must_use]
    pub fn increment(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    /// One second shorter, floored at [`Self::MIN`].
    #[must_use]
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }
}

impl Default for IntervalSeconds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for IntervalSeconds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| Error::InvalidInterval(s.to_string()))
    }
}

impl TryFrom<u64> for IntervalSeconds {
    type Error = Error;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::new(secs).ok_or_else(|| Error::InvalidInterval(secs.to_string()))
    }
}

impl From<IntervalSeconds> for u64 {
    fn from(interval: IntervalSeconds) -> Self {
        u64::from(interval.0)
    }
}

impl fmt::Display for IntervalSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        assert_eq!(IntervalSeconds::new(0), None);
        assert_eq!(IntervalSeconds::new(1), Some(IntervalSeconds::MIN));
        assert_eq!(IntervalSeconds::new(60), Some(IntervalSeconds::MAX));
        assert_eq!(IntervalSeconds::new(61), None);
    }

    #[test]
    fn test_coerce_out_of_range_to_default() {
        assert_eq!(IntervalSeconds::coerce(0).secs(), 10);
        assert_eq!(IntervalSeconds::coerce(600).secs(), 10);
        assert_eq!(IntervalSeconds::coerce(5).secs(), 5);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(IntervalSeconds::parse_lenient("30").secs(), 30);
        assert_eq!(IntervalSeconds::parse_lenient(" 7 ").secs(), 7);
        assert_eq!(IntervalSeconds::parse_lenient("abc").secs(), 10);
        assert_eq!(IntervalSeconds::parse_lenient("").secs(), 10);
        assert_eq!(IntervalSeconds::parse_lenient("-3").secs(), 10);
        assert_eq!(IntervalSeconds::parse_lenient("2.5").secs(), 10);
        assert_eq!(IntervalSeconds::parse_lenient("61").secs(), 10);
    }

    #[test]
    fn test_strict_parse_rejects() {
        assert!("abc".parse::<IntervalSeconds>().is_err());
        assert!("0".parse::<IntervalSeconds>().is_err());
        assert_eq!("15".parse::<IntervalSeconds>().unwrap().secs(), 15);
    }

    #[test]
    fn test_increment_decrement_saturate() {
        assert_eq!(IntervalSeconds::MAX.increment(), IntervalSeconds::MAX);
        assert_eq!(IntervalSeconds::MIN.decrement(), IntervalSeconds::MIN);
        assert_eq!(IntervalSeconds::DEFAULT.increment().secs(), 11);
        assert_eq!(IntervalSeconds::DEFAULT.decrement().secs(), 9);
    }

    #[test]
    fn test_duration_and_display() {
        assert_eq!(IntervalSeconds::DEFAULT.as_duration(), Duration::from_secs(10));
        assert_eq!(IntervalSeconds::MAX.to_string(), "60s");
    }

    #[test]
    fn test_serde_round_trip_rejects_out_of_range() {
        let ok: IntervalSeconds = serde_yaml_ng::from_str("20").unwrap();
        assert_eq!(ok.secs(), 20);
        assert!(serde_yaml_ng::from_str::<IntervalSeconds>("99").is_err());
    }
}
