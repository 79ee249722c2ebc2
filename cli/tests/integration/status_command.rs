//! Integration tests for `rime-provision status`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::fixture::Sandbox;

#[test]
fn test_status_json_on_fresh_state() {
    let sandbox = Sandbox::new("true");

    let output = sandbox
        .cmd()
        .args(["status", "--json"])
        .output()
        .expect("run status");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status is json");
    assert_eq!(doc["persisted"], false);
    assert!(doc["updated_at"].is_null());
    assert_eq!(doc["packages"]["rime"]["ibus-rime"], false);
    assert_eq!(doc["packages"]["rime"]["config-path"], false);
    assert_eq!(doc["packages"]["rime"]["plum"], false);
    assert!(!sandbox.path("state.json").exists());
}

#[test]
fn test_status_json_drops_unknown_steps() {
    let sandbox = Sandbox::new("true");
    sandbox.write_state(r#"{"version": 1, "packages": {"rime": {"ibus-rime": true, "config-path": true, "emoji": true}}}"#);

    let output = sandbox
        .cmd()
        .args(["status", "--json"])
        .output()
        .expect("run status");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status is json");
    assert_eq!(doc["persisted"], true);
    let rime = &doc["packages"]["rime"];
    assert_eq!(rime["ibus-rime"], true);
    assert_eq!(rime["config-path"], true);
    assert_eq!(rime["plum"], false);
    assert!(rime.get("emoji").is_none());
}

#[test]
fn test_status_human_marks_pending_steps() {
    let sandbox = Sandbox::new("true");
    sandbox.write_state(r#"{"version": 1, "packages": {"rime": {"ibus-rime": true}}}"#);

    sandbox
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("rime:"))
        .stdout(predicate::str::contains("config-path (pending)"))
        .stdout(predicate::str::contains("plum (pending)"))
        .stdout(predicate::str::contains("ibus-rime (pending)").not());
}

#[test]
fn test_status_after_install_reports_all_done() {
    let sandbox = Sandbox::new("true");
    sandbox.seed_plum();
    sandbox.cmd().arg("install").assert().success();

    let output = sandbox
        .cmd()
        .args(["status", "--json"])
        .output()
        .expect("run status");
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status is json");
    assert_eq!(doc["persisted"], true);
    assert!(doc["updated_at"].is_string());
    assert_eq!(doc["packages"]["rime"]["plum"], true);
}

#[test]
fn test_status_corrupt_state_fails() {
    let sandbox = Sandbox::new("true");
    sandbox.write_state("42");

    sandbox
        .cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
