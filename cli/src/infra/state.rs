//! Infrastructure implementation of the `InstallationStateStore` port.
//!
//! `StateManager` reads and writes the JSON state document with an atomic
//! write (temp file + rename) so an interrupted save never leaves a
//! truncated file behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::InstallationStateStore;
use crate::domain::{InstallationState, ProvisionError};

/// State file manager implementing `InstallationStateStore` for the infra layer.
pub struct StateManager {
    path: PathBuf,
}

impl StateManager {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a state file has been written yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn fs_error(path: &Path, source: std::io::Error) -> ProvisionError {
        ProvisionError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl InstallationStateStore for StateManager {
    fn load(&self) -> Result<InstallationState> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no state file, starting fresh");
            return Ok(InstallationState::fresh());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|source| Self::fs_error(&self.path, source))?;
        let decoded =
            InstallationState::decode(&content).map_err(|source| ProvisionError::StateCorrupt {
                path: self.path.clone(),
                source,
            })?;
        for key in &decoded.dropped_keys {
            tracing::warn!(path = %self.path.display(), "ignoring unknown state entry `{key}`");
        }
        tracing::debug!(path = %self.path.display(), "loaded installation state");
        Ok(decoded.state)
    }

    fn save(&self, state: &InstallationState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Self::fs_error(parent, source))?;
        }
        let content = state.encode(Utc::now()).context("serializing state")?;

        let temp_path = self.temp_path();
        std::fs::write(&temp_path, &content).map_err(|source| Self::fs_error(&temp_path, source))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|source| Self::fs_error(&self.path, source))?;

        tracing::debug!(path = %self.path.display(), "saved installation state");
        Ok(())
    }
}
