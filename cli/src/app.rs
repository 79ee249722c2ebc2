//! Application context: unified state passed to every command handler.
//!
//! `AppContext` resolves the configuration once in `Cli::run()`; command
//! handlers receive `&AppContext` instead of loose flags.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{Overrides, ProvisionConfig};
use crate::infra::config::{YamlConfigStore, host_dirs};
use crate::infra::logging::Verbosity;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Log debug events to the console.
    pub verbose: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Explicit config file, from `--config` or `RIME_PROVISION_CONFIG`.
    pub config: Option<PathBuf>,
    /// Path overrides from the command line.
    pub overrides: Overrides,
    /// Output rendering options.
    pub output: OutputFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Console log verbosity.
    pub verbosity: Verbosity,
    /// Whether console log lines carry ANSI colors.
    pub log_colors: bool,
    /// Where the configuration was read from.
    pub config_path: PathBuf,
    /// Resolved configuration.
    pub config: ProvisionConfig,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or if the resolved configuration is invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let store = YamlConfigStore::locate(flags.config)?;
        let file = store.load()?;
        let config = ProvisionConfig::resolve(file, flags.overrides, &host_dirs()?)
            .with_context(|| format!("invalid configuration in {}", store.path().display()))?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            verbosity: Verbosity::from_flags(flags.output.quiet, flags.output.verbose),
            log_colors: OutputContext::stderr_colors(flags.output.no_color),
            config_path: store.path().to_path_buf(),
            config,
        })
    }
}
