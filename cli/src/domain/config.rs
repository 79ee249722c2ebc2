//! Domain types for rime-provision configuration.
//!
//! Pure functions only, with no I/O. The home
//! and working directories are passed in as data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_STATE_FILE: &str = "state.json";
pub const DEFAULT_LOG_FILE: &str = "install.log";
pub const DEFAULT_PACKAGE_MANAGER: &[&str] = &["sudo", "apt", "install", "-y"];
pub const DEFAULT_SYSTEM_PACKAGES: &[&str] = &["ibus-rime"];
pub const DEFAULT_PLUM_REPOSITORY: &str = "https://github.com/rime/plum.git";
pub const DEFAULT_GIT: &str = "git";
pub const DEFAULT_RECIPE: &[&str] = &[
    ":preset",
    "pinyin-simp",
    "emoji:customize:schema=pinyin_simp",
];

/// Rime's user data directory, relative to the configuration directory.
pub const RIME_CONFIG_SUBDIR: &str = "ibus/rime";

/// Name of the plum checkout inside the workspace directory.
pub const PLUM_DIR: &str = "plum";

// ── File schema ──────────────────────────────────────────────────────────────

/// Configuration file as written by the operator. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub state_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    pub workspace_dir: Option<PathBuf>,
    /// Command prefix used to install system packages.
    pub package_manager: Option<Vec<String>>,
    pub system_packages: Option<Vec<String>>,
    pub plum: PlumFile,
}

/// `plum:` section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlumFile {
    pub repository: Option<String>,
    pub git: Option<String>,
    /// Arguments passed to `rime-install`.
    pub recipe: Option<Vec<String>>,
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub state_path: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    pub workspace_dir: Option<PathBuf>,
}

/// Process environment the defaults are derived from.
#[derive(Debug, Clone)]
pub struct HostDirs {
    /// Home directory, if one could be determined.
    pub home: Option<PathBuf>,
    /// Current working directory.
    pub cwd: PathBuf,
}

// ── Resolved configuration ───────────────────────────────────────────────────

/// Fully resolved configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub state_path: PathBuf,
    pub log_path: PathBuf,
    pub config_dir: PathBuf,
    pub workspace_dir: PathBuf,
    pub package_manager: Vec<String>,
    pub system_packages: Vec<String>,
    pub plum: PlumConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlumConfig {
    pub repository: String,
    pub git: String,
    pub recipe: Vec<String>,
}

impl ProvisionConfig {
    /// Merge overrides, file values and defaults, in that order of precedence.
    ///
    /// Relative paths are resolved against `host.cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if a home-relative default is needed but no home
    /// directory is known, or if a command list is empty.
    pub fn resolve(
        file: ConfigFile,
        overrides: Overrides,
        host: &HostDirs,
    ) -> Result<Self, ConfigError> {
        let absolute = |p: PathBuf| absolutize(&host.cwd, p);
        let home = || host.home.clone().ok_or(ConfigError::NoHome);

        let state_path = absolute(
            overrides
                .state_path
                .or(file.state_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
        );
        let log_path = match file.log_path {
            Some(p) => absolute(p),
            None => state_path
                .parent()
                .map_or_else(|| host.cwd.clone(), Path::to_path_buf)
                .join(DEFAULT_LOG_FILE),
        };
        let config_dir = match overrides.config_dir.or(file.config_dir) {
            Some(p) => absolute(p),
            None => home()?.join(".config"),
        };
        let workspace_dir = match overrides.workspace_dir.or(file.workspace_dir) {
            Some(p) => absolute(p),
            None => home()?.join("github"),
        };

        let package_manager = file
            .package_manager
            .unwrap_or_else(|| to_owned(DEFAULT_PACKAGE_MANAGER));
        if package_manager.is_empty() {
            return Err(ConfigError::Empty("package_manager"));
        }
        let system_packages = file
            .system_packages
            .unwrap_or_else(|| to_owned(DEFAULT_SYSTEM_PACKAGES));
        if system_packages.is_empty() {
            return Err(ConfigError::Empty("system_packages"));
        }

        let git = file.plum.git.unwrap_or_else(|| DEFAULT_GIT.to_string());
        if git.is_empty() {
            return Err(ConfigError::Empty("plum.git"));
        }

        Ok(Self {
            state_path,
            log_path,
            config_dir,
            workspace_dir,
            package_manager,
            system_packages,
            plum: PlumConfig {
                repository: file
                    .plum
                    .repository
                    .unwrap_or_else(|| DEFAULT_PLUM_REPOSITORY.to_string()),
                git,
                recipe: file.plum.recipe.unwrap_or_else(|| to_owned(DEFAULT_RECIPE)),
            },
        })
    }

    /// Rime's user configuration directory.
    #[must_use]
    pub fn rime_config_dir(&self) -> PathBuf {
        self.config_dir.join(RIME_CONFIG_SUBDIR)
    }

    /// Where plum is cloned.
    #[must_use]
    pub fn plum_dir(&self) -> PathBuf {
        self.workspace_dir.join(PLUM_DIR)
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
