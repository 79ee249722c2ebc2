//! Tests for the package-scoped progress handle and the step executor.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use rime_provision::application::services::step_runner::{
    PackageProgress, RunReport, StepExecutor, StepOutcome,
};
use rime_provision::domain::{InstallationState, Package, ProvisionError, Step};

use crate::helpers::sample_plan;
use crate::mocks::{MemoryFs, NoopReporter, RecordingReporter, RecordingRunner};

// ── PackageProgress ───────────────────────────────────────────────────────────

#[test]
fn test_package_progress_marks_own_steps() {
    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    assert!(!progress.is_done(Step::Plum));
    progress.mark_done(Step::Plum).expect("rime step");
    assert!(progress.is_done(Step::Plum));
    assert_eq!(progress.package(), Package::Rime);
    assert!(state.is_done(Step::Plum));
}

// ── run_step ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_run_step_already_done_runs_nothing() {
    let runner = RecordingRunner::new();
    let fs = MemoryFs::new();
    let executor = StepExecutor::new(&runner, &fs, &NoopReporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    state.mark_done(Step::IbusRime);
    let mut progress = PackageProgress::new(Package::Rime, &mut state);

    let outcome = executor
        .run_step(&mut progress, &plan.steps[0])
        .await
        .expect("skip");
    assert_eq!(outcome, StepOutcome::AlreadyDone);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_run_step_completes_and_marks_flag() {
    let runner = RecordingRunner::new();
    let fs = MemoryFs::new();
    let executor = StepExecutor::new(&runner, &fs, &NoopReporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    let outcome = executor
        .run_step(&mut progress, &plan.steps[1])
        .await
        .expect("create dir");

    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(fs.created(), vec![PathBuf::from("/cfg/ibus/rime")]);
    assert!(state.is_done(Step::ConfigPath));
}

#[tokio::test]
async fn test_run_step_artifact_exists_warns_and_marks_flag() {
    let runner = RecordingRunner::new();
    let fs = MemoryFs::new().with_existing("/cfg/ibus/rime");
    let reporter = RecordingReporter::default();
    let executor = StepExecutor::new(&runner, &fs, &reporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    let outcome = executor
        .run_step(&mut progress, &plan.steps[1])
        .await
        .expect("shortcut");

    assert_eq!(outcome, StepOutcome::ArtifactExists);
    assert!(fs.created().is_empty(), "creating action must not repeat");
    assert_eq!(reporter.warnings().len(), 1);
    assert!(reporter.warnings()[0].contains("/cfg/ibus/rime"));
    assert!(state.is_done(Step::ConfigPath));
}

#[tokio::test]
async fn test_run_step_artifact_exists_still_runs_follow_up() {
    let runner = RecordingRunner::new();
    let fs = MemoryFs::new().with_existing("/ws/plum");
    let executor = StepExecutor::new(&runner, &fs, &NoopReporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    let outcome = executor
        .run_step(&mut progress, &plan.steps[2])
        .await
        .expect("follow-up only");

    assert_eq!(outcome, StepOutcome::ArtifactExists);
    assert_eq!(runner.calls(), vec!["rime-install"]);
    assert!(fs.created().is_empty());
    assert!(state.is_done(Step::Plum));
}

#[tokio::test]
async fn test_run_step_failure_leaves_flag_unset_and_logs_stderr() {
    let runner = RecordingRunner::new().failing("install-pkg", 100, "E: Unable to locate package\n");
    let fs = MemoryFs::new();
    let reporter = RecordingReporter::default();
    let executor = StepExecutor::new(&runner, &fs, &reporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    let err = executor
        .run_step(&mut progress, &plan.steps[0])
        .await
        .expect_err("non-zero exit");

    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::ExternalCommand { command, code, stderr }) => {
            assert_eq!(command, "install-pkg");
            assert_eq!(*code, Some(100));
            assert_eq!(stderr, "E: Unable to locate package");
        }
        other => panic!("expected ExternalCommand, got {other:?}"),
    }
    assert_eq!(reporter.errors(), vec!["E: Unable to locate package"]);
    assert!(!state.is_done(Step::IbusRime));
}

#[tokio::test]
async fn test_run_step_follow_up_failure_leaves_flag_unset() {
    let runner = RecordingRunner::new().failing("rime-install", 1, "");
    let fs = MemoryFs::new();
    let reporter = RecordingReporter::default();
    let executor = StepExecutor::new(&runner, &fs, &reporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut progress = PackageProgress::new(Package::Rime, &mut state);
    assert!(executor.run_step(&mut progress, &plan.steps[2]).await.is_err());

    assert_eq!(runner.calls(), vec!["clone-plum", "rime-install"]);
    assert!(reporter.errors().is_empty(), "empty stderr is not logged");
    assert!(!state.is_done(Step::Plum));
}

// ── run_package ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_run_package_stops_at_first_failure() {
    let runner = RecordingRunner::new();
    let fs = MemoryFs::new().with_read_only("/cfg/ibus/rime");
    let executor = StepExecutor::new(&runner, &fs, &NoopReporter);
    let plan = sample_plan();

    let mut state = InstallationState::fresh();
    let mut report = RunReport::default();
    let err = executor
        .run_package(&mut state, &plan, &mut report)
        .await
        .expect_err("config dir cannot be created");

    assert!(format!("{err:#}").contains("step `config-path` of `rime` failed"));
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Filesystem { .. })
    ));
    assert_eq!(runner.calls(), vec!["install-pkg"], "plum never attempted");
    assert_eq!(report.outcome(Step::IbusRime), Some(StepOutcome::Completed));
    assert_eq!(report.outcome(Step::ConfigPath), Some(StepOutcome::Failed));
    assert_eq!(report.outcome(Step::Plum), None);
    assert!(state.is_done(Step::IbusRime));
    assert!(!state.is_done(Step::ConfigPath));
    assert!(!state.is_done(Step::Plum));
}
