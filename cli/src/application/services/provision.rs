//! Application service: the full provisioning run.
//!
//! Loads the state once, runs every package plan in order and saves the
//! state exactly once afterwards, whether or not a step failed.

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, InstallationStateStore, LocalFs, ProgressReporter,
};
use crate::application::services::step_runner::{RunReport, StepExecutor};
use crate::domain::{InstallationState, PackagePlan};

/// Injected dependencies of a provisioning run.
pub struct ProvisionPorts<'a, S, C, F, R> {
    pub store: &'a S,
    pub runner: &'a C,
    pub fs: &'a F,
    pub reporter: &'a R,
}

/// Run all `plans` against the persisted state.
///
/// Fails before running anything if the state cannot be loaded. Once steps
/// have started, the state is saved even if one of them fails, so completed
/// steps are skipped on the next run.
///
/// The report of every attempted step is returned alongside the result, so
/// callers can summarize a failed run too. It is empty when loading failed.
pub async fn provision<S, C, F, R>(
    ports: &ProvisionPorts<'_, S, C, F, R>,
    plans: &[PackagePlan],
) -> (RunReport, Result<()>)
where
    S: InstallationStateStore,
    C: CommandRunner,
    F: LocalFs,
    R: ProgressReporter,
{
    let mut report = RunReport::default();
    let mut state = match ports.store.load() {
        Ok(state) => state,
        Err(e) => return (report, Err(e)),
    };
    announce_pending(ports.reporter, &state, plans);

    let executor = StepExecutor::new(ports.runner, ports.fs, ports.reporter);
    let outcome = run_plans(&executor, &mut state, plans, &mut report).await;
    let saved = ports.store.save(&state);

    let result = match (outcome, saved) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Err(e), Err(save_err)) => {
            ports
                .reporter
                .error(&format!("saving installation state failed: {save_err:#}"));
            Err(e)
        }
    };
    (report, result)
}

/// Report which steps the loaded state still has pending.
fn announce_pending<R: ProgressReporter>(
    reporter: &R,
    state: &InstallationState,
    plans: &[PackagePlan],
) {
    let pending: Vec<String> = plans
        .iter()
        .flat_map(|plan| plan.steps.iter())
        .filter(|step| !state.is_done(step.step))
        .map(|step| format!("{}/{}", step.step.package(), step.step))
        .collect();
    if pending.is_empty() {
        reporter.step("every step is already done");
    } else {
        reporter.step(&format!("pending steps: {}", pending.join(", ")));
    }
}

async fn run_plans<C, F, R>(
    executor: &StepExecutor<'_, C, F, R>,
    state: &mut InstallationState,
    plans: &[PackagePlan],
    report: &mut RunReport,
) -> Result<()>
where
    C: CommandRunner,
    F: LocalFs,
    R: ProgressReporter,
{
    for plan in plans {
        executor.run_package(state, plan, report).await?;
    }
    Ok(())
}
