//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors that abort a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("`{command}` exited with {}", describe_exit(*code))]
    ExternalCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "state file {} is corrupt. Inspect or remove it, then re-run.",
        path.display()
    )]
    StateCorrupt {
        path: PathBuf,
        #[source]
        source: StateFormatError,
    },

    #[error("filesystem operation failed on {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("another run holds the lock on {}", path.display())]
    StateLocked { path: PathBuf },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code (terminated by signal)".to_string(), |c| format!("status {c}"))
}

// ── State format errors ───────────────────────────────────────────────────────

/// Reasons a persisted state document cannot be decoded.
#[derive(Debug, Error)]
pub enum StateFormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to loading and resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("config file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("config value `{0}` must not be empty")]
    Empty(&'static str),

    #[error("cannot determine home directory")]
    NoHome,
}
