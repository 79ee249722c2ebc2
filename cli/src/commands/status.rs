//! `rime-provision status`: show which steps have completed.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::InstallationStateStore;
use crate::infra::state::StateManager;
use crate::output::{HumanRenderer, json};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the status command. Reads the state without taking the run lock.
///
/// # Errors
///
/// Returns an error if the state file exists but cannot be read or decoded.
pub fn run(app: &AppContext, args: &StatusArgs) -> Result<ExitCode> {
    let store = StateManager::new(app.config.state_path.clone());
    let persisted = store.exists();
    let state = store.load()?;

    if args.json {
        println!("{}", json::format_status(store.path(), persisted, &state)?);
    } else {
        HumanRenderer::new(&app.output).render_status(store.path(), persisted, &state);
    }
    Ok(ExitCode::SUCCESS)
}
