//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{ConfigError, ConfigFile, HostDirs};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "RIME_PROVISION_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
pub struct YamlConfigStore {
    path: PathBuf,
    /// Named explicitly by the operator, so it must exist.
    required: bool,
}

impl YamlConfigStore {
    /// Store for the default location; a missing file means all defaults.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            required: false,
        }
    }

    /// Store for a file the operator named; a missing file is an error.
    #[must_use]
    pub fn explicit(path: PathBuf) -> Self {
        Self {
            path,
            required: true,
        }
    }

    /// Use `explicit` if given, otherwise `~/.config/rime-provision/config.yaml`.
    ///
    /// `explicit` already carries the `RIME_PROVISION_CONFIG` value when clap
    /// read it from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no path was given and the home directory cannot be
    /// determined.
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::explicit(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(Self::new(
            home.join(".config")
                .join("rime-provision")
                .join("config.yaml"),
        ))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ConfigFile> {
        if !self.path.exists() {
            if self.required {
                return Err(ConfigError::Missing {
                    path: self.path.clone(),
                }
                .into());
            }
            return Ok(ConfigFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Home and working directories of the current process.
///
/// # Errors
///
/// Returns an error if the working directory cannot be read.
pub fn host_dirs() -> Result<HostDirs> {
    Ok(HostDirs {
        home: dirs::home_dir(),
        cwd: std::env::current_dir().context("cannot read current directory")?,
    })
}
