//! Application service: run the steps of a package group.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::fmt;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::domain::{
    Action, InstallationState, Package, PackagePlan, ProvisionError, Step, StepPlan,
};

/// Completion flags of a single package group.
///
/// Borrows the run's state mutably, so only one group can be worked on at a
/// time and nothing outside the run can observe a half-updated state.
pub struct PackageProgress<'a> {
    package: Package,
    state: &'a mut InstallationState,
}

impl<'a> PackageProgress<'a> {
    pub fn new(package: Package, state: &'a mut InstallationState) -> Self {
        Self { package, state }
    }

    #[must_use]
    pub fn package(&self) -> Package {
        self.package
    }

    #[must_use]
    pub fn is_done(&self, step: Step) -> bool {
        self.state.is_done(step)
    }

    /// Record `step` as completed.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` belongs to another package.
    pub fn mark_done(&mut self, step: Step) -> Result<()> {
        anyhow::ensure!(
            step.package() == self.package,
            "step `{step}` does not belong to package `{}`",
            self.package
        );
        self.state.mark_done(step);
        Ok(())
    }
}

/// How a step ended within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Flag was already set; nothing ran.
    AlreadyDone,
    /// Artifact was present; creating actions were skipped, flag set.
    ArtifactExists,
    /// Actions ran successfully, flag set.
    Completed,
    /// An action failed; flag left unset and the run aborted.
    Failed,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepOutcome::AlreadyDone => "already done",
            StepOutcome::ArtifactExists => "done, artifact already present",
            StepOutcome::Completed => "completed",
            StepOutcome::Failed => "failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub package: Package,
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Outcomes of every step attempted in a run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records: Vec<StepRecord>,
}

impl RunReport {
    #[must_use]
    pub fn outcome(&self, step: Step) -> Option<StepOutcome> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| r.outcome)
    }

    #[must_use]
    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// Executes step plans against injected ports.
pub struct StepExecutor<'a, C, F, R> {
    runner: &'a C,
    fs: &'a F,
    reporter: &'a R,
}

impl<'a, C, F, R> StepExecutor<'a, C, F, R>
where
    C: CommandRunner,
    F: LocalFs,
    R: ProgressReporter,
{
    pub fn new(runner: &'a C, fs: &'a F, reporter: &'a R) -> Self {
        Self {
            runner,
            fs,
            reporter,
        }
    }

    /// Run every step of `plan` in order, stopping at the first failure.
    ///
    /// Each attempted step is appended to `report`, including the failed one.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    pub async fn run_package(
        &self,
        state: &mut InstallationState,
        plan: &PackagePlan,
        report: &mut RunReport,
    ) -> Result<()> {
        self.reporter.step(&format!("provisioning {} ...", plan.package));
        let mut progress = PackageProgress::new(plan.package, state);

        for step_plan in &plan.steps {
            match self.run_step(&mut progress, step_plan).await {
                Ok(outcome) => report.records.push(StepRecord {
                    package: plan.package,
                    step: step_plan.step,
                    outcome,
                }),
                Err(e) => {
                    report.records.push(StepRecord {
                        package: plan.package,
                        step: step_plan.step,
                        outcome: StepOutcome::Failed,
                    });
                    self.reporter
                        .error(&format!("provisioning {} failed", plan.package));
                    return Err(e).with_context(|| {
                        format!("step `{}` of `{}` failed", step_plan.step, plan.package)
                    });
                }
            }
        }
        Ok(())
    }

    /// Run a single step, honouring its flag and artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if any action fails; the step is then left unmarked.
    pub async fn run_step(
        &self,
        progress: &mut PackageProgress<'_>,
        plan: &StepPlan,
    ) -> Result<StepOutcome> {
        if progress.is_done(plan.step) {
            self.reporter
                .step(&format!("{} already done, skipping", plan.step));
            return Ok(StepOutcome::AlreadyDone);
        }

        self.reporter.step(&format!("{} ...", plan.description));

        let outcome = match &plan.artifact {
            Some(artifact) if self.fs.exists(artifact) => {
                self.reporter.warn(&format!(
                    "{} already exists, skipping creation",
                    artifact.display()
                ));
                StepOutcome::ArtifactExists
            }
            _ => {
                for action in &plan.create {
                    self.perform(action).await?;
                }
                StepOutcome::Completed
            }
        };

        for action in &plan.follow_up {
            self.perform(action).await?;
        }

        progress.mark_done(plan.step)?;
        self.reporter.success(&format!("{} done", plan.step));
        Ok(outcome)
    }

    async fn perform(&self, action: &Action) -> Result<()> {
        match action {
            Action::CreateDir(path) => self.fs.create_dir_all(path),
            Action::Run(command) => {
                self.reporter.step(&format!("running `{command}`"));
                let output = self.runner.run(command).await?;
                if output.status.success() {
                    return Ok(());
                }
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if !stderr.is_empty() {
                    self.reporter.error(&stderr);
                }
                Err(ProvisionError::ExternalCommand {
                    command: command.to_string(),
                    code: output.status.code(),
                    stderr,
                }
                .into())
            }
        }
    }
}
