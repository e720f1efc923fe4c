//! Diagnostic logging for binwatch.
//!
//! Writes `[+0000ms] [LEVEL] [component] message` lines to stderr.
//! Disabled by default; enabled via the `--debug` flag or the
//! `BINWATCH_DEBUG=1` environment variable.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

/// Global debug mode flag.
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Start time stored as millis since UNIX epoch (atomic-safe).
static START_TIME_MS: AtomicU64 = AtomicU64::new(0);

/// Lowest level that is written once enabled.
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Debug as u8);

/// Environment variable that turns logging on.
pub const DEBUG_ENV_VAR: &str = "BINWATCH_DEBUG";

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Enables debug mode globally.
pub fn enable() {
    START_TIME_MS.store(now_ms(), Ordering::SeqCst);
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disables debug mode globally.
pub fn disable() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Enables debug mode when `BINWATCH_DEBUG` is set to `1` or `true`.
///
/// Returns whether logging ended up enabled.
pub fn enable_from_env() -> bool {
    let requested = std::env::var(DEBUG_ENV_VAR)
        .map(|v| env_flag(&v))
        .unwrap_or(false);
    if requested {
        enable();
    }
    is_enabled()
}

fn env_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Returns true if debug mode is enabled.
#[inline]
pub fn is_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Sets the lowest level that will be written.
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Returns true if a message at `level` would currently be written.
#[inline]
pub fn level_enabled(level: Level) -> bool {
    is_enabled() && passes(level, MIN_LEVEL.load(Ordering::Relaxed))
}

#[inline]
fn passes(level: Level, min: u8) -> bool {
    level as u8 >= min
}

fn elapsed_ms() -> u64 {
    let start = START_TIME_MS.load(Ordering::Relaxed);
    if start == 0 {
        return 0;
    }
    now_ms().saturating_sub(start)
}

/// Log levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Per-tick detail.
    Trace = 0,
    /// Debug information
    Debug = 1,
    /// Lifecycle events (start, stop, reschedule).
    Info = 2,
    /// Recovered anomalies (repairs, clamped input).
    Warn = 3,
    /// Errors
    Error = 4,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            Level::Trace => "\x1b[90m", // Gray
            Level::Debug => "\x1b[36m", // Cyan
            Level::Info => "\x1b[32m",  // Green
            Level::Warn => "\x1b[33m",  // Yellow
            Level::Error => "\x1b[31m", // Red
        }
    }
}

/// Formats one log line without color codes.
#[must_use]
pub fn format_line(elapsed_ms: u64, level: Level, component: &str, message: &str) -> String {
    format!("[+{:04}ms] [{:5}] [{}] {}", elapsed_ms, level.as_str(), component, message)
}

/// Logs a message if debug mode is enabled and `level` passes the filter.
pub fn log(level: Level, component: &str, message: &str) {
    if !level_enabled(level) {
        return;
    }

    let reset = "\x1b[0m";
    let _ = writeln!(
        io::stderr(),
        "[+{:04}ms] {}[{:5}]{} [{}] {}",
        elapsed_ms(),
        level.color_code(),
        level.as_str(),
        reset,
        component,
        message
    );
}

/// Logs with format arguments.
#[macro_export]
macro_rules! debug_log {
    ($level:expr, $component:expr, $($arg:tt)*) => {
        if $crate::debug::level_enabled($level) {
            $crate::debug::log($level, $component, &format!($($arg)*));
        }
    };
}

/// Convenience macro for trace level.
#[macro_export]
macro_rules! trace {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Trace, $component, $($arg)*)
    };
}

/// Convenience macro for debug level.
#[macro_export]
macro_rules! debug {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Debug, $component, $($arg)*)
    };
}

/// Convenience macro for info level.
#[macro_export]
macro_rules! info {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Info, $component, $($arg)*)
    };
}

/// Convenience macro for warn level.
#[macro_export]
macro_rules! warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Warn, $component, $($arg)*)
    };
}

/// Convenience macro for error level.
#[macro_export]
macro_rules! error {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Error, $component, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only this test flips the global flag; the rest exercise pure helpers.
    #[test]
    fn test_enable_disable_and_log() {
        enable();
        assert!(is_enabled());
        log(Level::Info, "test", "hello world");
        crate::warn!("test", "formatted {}", 42);

        disable();
        assert!(!is_enabled());
        log(Level::Error, "test", "suppressed");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_level_filter() {
        assert!(passes(Level::Warn, Level::Info as u8));
        assert!(passes(Level::Info, Level::Info as u8));
        assert!(!passes(Level::Trace, Level::Debug as u8));
    }

    #[test]
    fn test_level_as_str() {
        assert_eq!(Level::Trace.as_str(), "TRACE");
        assert_eq!(Level::Debug.as_str(), "DEBUG");
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Warn.as_str(), "WARN");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_level_has_color() {
        for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
            assert!(!level.color_code().is_empty());
        }
    }

    #[test]
    fn test_format_line() {
        let line = format_line(7, Level::Warn, "controller", "interval clamped");
        assert_eq!(line, "[+0007ms] [WARN ] [controller] interval clamped");
    }

    #[test]
    fn test_env_flag_values() {
        assert!(env_flag("1"));
        assert!(env_flag(" TRUE "));
        assert!(env_flag("on"));
        assert!(!env_flag("0"));
        assert!(!env_flag(""));
    }
}
