//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::Overrides;
use crate::infra::config::CONFIG_ENV;

/// Install and configure the ibus-rime input method, skipping finished steps
#[derive(Parser)]
#[command(name = "rime-provision", version, propagate_version = true)]
pub struct Cli {
    /// Configuration file [default: ~/.config/rime-provision/config.yaml]
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Installation state file [default: ./state.json]
    #[arg(long, global = true, value_name = "FILE")]
    pub state_path: Option<PathBuf>,

    /// Base configuration directory [default: ~/.config]
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory plum is cloned into [default: ~/github]
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace_dir: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug details to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output; a set `NO_COLOR` variable does the same
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every pending provisioning step (default)
    Install,

    /// Show which steps have completed
    Status(commands::status::StatusArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the command fails
    /// before it can report the failure itself.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            state_path,
            config_dir,
            workspace_dir,
            quiet,
            verbose,
            no_color,
            command,
        } = self;

        let app = AppContext::new(AppFlags {
            config,
            overrides: Overrides {
                state_path,
                config_dir,
                workspace_dir,
            },
            output: OutputFlags {
                no_color,
                quiet,
                verbose,
            },
        })?;

        match command.unwrap_or(Command::Install) {
            Command::Install => commands::install::run(&app).await,
            Command::Status(args) => commands::status::run(&app, &args),
        }
    }
}
