//! `rime-provision install`: run every pending provisioning step.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::{ProvisionPorts, provision};
use crate::domain::plan::provisioning_plan;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::lock::StateLock;
use crate::infra::logging::{self, LogOptions, Verbosity};
use crate::infra::state::StateManager;
use crate::output::{HumanRenderer, LogReporter};

/// Run the install command.
///
/// The state lock is taken before the log file is opened, so a run refused
/// by the lock leaves the holder's log alone. Step failures are logged,
/// summarized and turned into a failing exit code.
///
/// # Errors
///
/// Returns an error if the lock is held by another run or the log file
/// cannot be set up.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = &app.config;
    let mut lock = StateLock::open(&config.state_path)?;
    let _guard = lock.try_acquire()?;

    logging::init(&LogOptions {
        log_path: config.log_path.clone(),
        verbosity: app.verbosity,
        ansi: app.log_colors,
    })?;
    tracing::debug!(config = %app.config_path.display(), "configuration loaded");

    let plans = provisioning_plan(config);
    let store = StateManager::new(config.state_path.clone());
    let runner = TokioCommandRunner::new(app.verbosity != Verbosity::Quiet);
    let ports = ProvisionPorts {
        store: &store,
        runner: &runner,
        fs: &LocalFs,
        reporter: &LogReporter,
    };
    let (report, outcome) = provision(&ports, &plans).await;

    HumanRenderer::new(&app.output).render_summary(&report);
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
