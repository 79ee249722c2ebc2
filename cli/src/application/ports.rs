//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::{CommandSpec, ConfigFile, InstallationState};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command to completion.
    ///
    /// Implementations forward the child's output to the operator as it
    /// arrives and return the captured streams with the exit status. A
    /// non-zero exit is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    async fn run(&self, command: &CommandSpec) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. The trait is sync.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message.
    fn error(&self, message: &str);
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Abstracts installation state persistence (load/save).
pub trait InstallationStateStore {
    /// Load the persisted state, or a fresh one if nothing was persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the state exists but cannot be read or decoded.
    fn load(&self) -> Result<InstallationState>;
    /// Persist the full state, replacing previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &InstallationState) -> Result<()>;
}

/// The filesystem operations steps need.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the operator's configuration file.
pub trait ConfigStore {
    /// Load the configuration file; a missing file yields all defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ConfigFile>;
    /// Path the configuration is read from.
    fn path(&self) -> &Path;
}
