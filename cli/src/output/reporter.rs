//! `LogReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Turns application progress events into `tracing` events, so they reach
//! both the console and the log file through the subscriber set up in
//! `infra::logging`.

use crate::application::ports::ProgressReporter;

/// Progress reporter that emits `tracing` events.
///
/// - `step()` and `success()` log at INFO
/// - `warn()` logs at WARN
/// - `error()` logs at ERROR
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn step(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn success(&self, message: &str) {
        tracing::info!("✓ {message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
