//! Temp-dir sandbox with a config file pointing every path inside it.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Sandbox whose package manager is `package_manager`.
    pub fn new(package_manager: &str) -> Self {
        let sandbox = Self {
            dir: TempDir::new().expect("temp dir"),
        };
        sandbox.write_config(package_manager, &sandbox.path("config"));
        sandbox
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Rewrite the config file with another package manager and config dir.
    pub fn write_config(&self, package_manager: &str, config_dir: &Path) {
        let yaml = format!(
            "state_path: {state}\nconfig_dir: {config}\nworkspace_dir: {ws}\npackage_manager: [\"{package_manager}\"]\n",
            state = self.path("state.json").display(),
            config = config_dir.display(),
            ws = self.path("ws").display(),
        );
        std::fs::write(self.path("config.yaml"), yaml).expect("write config");
    }

    /// Pre-create plum with a `rime-install` script that echoes its arguments.
    pub fn seed_plum(&self) {
        let plum = self.path("ws/plum");
        std::fs::create_dir_all(&plum).expect("create plum");
        std::fs::write(plum.join("rime-install"), "echo \"installed $*\"\n").expect("write script");
    }

    pub fn write_state(&self, content: &str) {
        std::fs::write(self.path("state.json"), content).expect("write state");
    }

    pub fn state(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.path("state.json")).expect("read state");
        serde_json::from_str(&content).expect("state is json")
    }

    /// `[ibus-rime, config-path, plum]` flags from the state file.
    pub fn flags(&self) -> [bool; 3] {
        let state = self.state();
        let rime = &state["packages"]["rime"];
        ["ibus-rime", "config-path", "plum"].map(|k| rime[k].as_bool().expect("bool flag"))
    }

    pub fn log(&self) -> String {
        std::fs::read_to_string(self.path("install.log")).expect("read log")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rime-provision"));
        cmd.env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("RIME_PROVISION_CONFIG")
            .current_dir(self.root())
            .arg("--config")
            .arg(self.path("config.yaml"));
        cmd
    }
}
