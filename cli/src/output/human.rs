//! Human-readable terminal renderer.

use std::path::Path;

use crate::application::services::step_runner::{RunReport, StepOutcome};
use crate::domain::{InstallationState, Package};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render persisted step flags, one section per package.
    pub fn render_status(&self, state_path: &Path, persisted: bool, state: &InstallationState) {
        self.ctx.kv("State file:", &state_path.display().to_string());
        match state.updated_at() {
            Some(at) => self.ctx.kv("Last saved:", &at.to_rfc3339()),
            None if persisted => self.ctx.kv("Last saved:", "unknown"),
            None => self.ctx.kv("Last saved:", "never"),
        }

        for &package in Package::ALL {
            println!();
            self.ctx.header(&format!("{package}:"));
            for (step, done) in state.package_flags(package) {
                if done {
                    self.ctx.success(step.key());
                } else {
                    self.ctx.pending(&format!("{step} (pending)"));
                }
            }
        }
    }

    /// Render the end-of-run summary: one line per attempted step, then totals.
    ///
    /// Prints nothing when no step was attempted.
    pub fn render_summary(&self, report: &RunReport) {
        if report.records.is_empty() {
            return;
        }

        let mut current = None;
        for record in &report.records {
            if current != Some(record.package) {
                self.ctx.header(&format!("{}:", record.package));
                current = Some(record.package);
            }
            let line = format!("{} {}", record.step, record.outcome);
            match record.outcome {
                StepOutcome::Completed | StepOutcome::ArtifactExists => self.ctx.success(&line),
                StepOutcome::AlreadyDone => self.ctx.pending(&line),
                StepOutcome::Failed => self.ctx.error(&line),
            }
        }

        let completed =
            report.count(StepOutcome::Completed) + report.count(StepOutcome::ArtifactExists);
        let skipped = report.count(StepOutcome::AlreadyDone);
        match report.count(StepOutcome::Failed) {
            0 => self.ctx.success(&format!(
                "provisioning finished: {completed} completed, {skipped} skipped"
            )),
            failed => self.ctx.error(&format!(
                "provisioning stopped: {completed} completed, {skipped} skipped, {failed} failed"
            )),
        }
    }
}
