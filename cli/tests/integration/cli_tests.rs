//! Integration tests for the CLI surface.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn rime_provision() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rime-provision"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_help_lists_commands() {
    rime_provision()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_cli_help_lists_path_overrides() {
    rime_provision()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--state-path"))
        .stdout(predicate::str::contains("--workspace-dir"))
        .stdout(predicate::str::contains("--config-dir"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    rime_provision()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rime-provision 0.1.0"));
}

#[test]
fn test_cli_unknown_subcommand_fails() {
    rime_provision().arg("uninstall").assert().failure();
}
