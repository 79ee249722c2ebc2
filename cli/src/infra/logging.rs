//! Logging setup: human-readable console lines plus a full log file.
//!
//! The console layer writes to stderr without timestamps; the file layer
//! records every event at `debug` and above, including child output, with
//! timestamps. The log file is truncated at the start of each run.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer as _, fmt};

use crate::domain::ProvisionError;
use crate::infra::command_runner::CHILD_OUTPUT_TARGET;

const FILE_TIME_FORMAT: &str = "[%Y/%m/%d %H:%M:%S]";

/// Console verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }

    /// Console filter directives; child output is echoed raw, never as events.
    #[must_use]
    pub fn console_directives(self) -> String {
        format!("{},{CHILD_OUTPUT_TARGET}=off", self.level())
    }
}

pub struct LogOptions {
    pub log_path: PathBuf,
    pub verbosity: Verbosity,
    pub ansi: bool,
}

/// Install the global subscriber.
///
/// `RUST_LOG` replaces the console filter when set.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a global
/// subscriber is already installed.
pub fn init(opts: &LogOptions) -> Result<()> {
    if let Some(parent) = opts.log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ProvisionError::Filesystem {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(&opts.log_path).map_err(|source| ProvisionError::Filesystem {
        path: opts.log_path.clone(),
        source,
    })?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(opts.verbosity.console_directives()));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(opts.ansi)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("installing log subscriber")?;

    tracing::debug!(log_file = %opts.log_path.display(), "logging initialized");
    Ok(())
}
