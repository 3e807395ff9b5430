#![deny(missing_docs)]
//! Shared logging utilities for the render poller workspace.
//!
//! This crate provides the `poll_*` logging macros used across the codebase,
//! a parser for configured log levels, and a minimal test initializer for the
//! global logger.

use log::LevelFilter;

/// Log target used by every `poll_*` macro.
pub const TARGET: &str = "render_poll";

/// Logs a trace-level message under the poller target.
#[macro_export]
macro_rules! poll_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the poller target.
#[macro_export]
macro_rules! poll_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the poller target.
#[macro_export]
macro_rules! poll_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the poller target.
#[macro_export]
macro_rules! poll_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the poller target.
#[macro_export]
macro_rules! poll_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Parses a configured level name (`"off"`, `"error"`, ..., `"trace"`).
///
/// Matching is case-insensitive. Unknown names yield `None`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse::<LevelFilter>().ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
