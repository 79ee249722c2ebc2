//! Step plans: what each provisioning step does, as data.
//!
//! A plan describes actions without performing them, so the step runner can
//! be driven by mocks in tests and the rime sequence can be inspected.

use std::fmt;
use std::path::PathBuf;

use crate::domain::config::ProvisionConfig;
use crate::domain::state::{Package, Step};

/// An external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; inherits the caller's when `None`.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A single side effect performed by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run an external program to completion.
    Run(CommandSpec),
    /// Create a directory and any missing parents.
    CreateDir(PathBuf),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Run(cmd) => write!(f, "run `{cmd}`"),
            Action::CreateDir(path) => write!(f, "create {}", path.display()),
        }
    }
}

/// How to perform one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    pub step: Step,
    /// Human-readable progress line.
    pub description: String,
    /// Presence of this path means `create` already happened.
    pub artifact: Option<PathBuf>,
    /// Actions skipped when the artifact exists.
    pub create: Vec<Action>,
    /// Actions that run whenever the step is not yet marked done.
    pub follow_up: Vec<Action>,
}

/// Ordered steps of one package group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    pub package: Package,
    pub steps: Vec<StepPlan>,
}

/// Every package group, in execution order.
#[must_use]
pub fn provisioning_plan(config: &ProvisionConfig) -> Vec<PackagePlan> {
    Package::ALL
        .iter()
        .map(|&package| match package {
            Package::Rime => rime_plan(config),
        })
        .collect()
}

/// ibus-rime, its config directory, then plum with the configured recipe.
#[must_use]
pub fn rime_plan(config: &ProvisionConfig) -> PackagePlan {
    let (program, prefix) = config
        .package_manager
        .split_first()
        .map_or(("", &[][..]), |(p, rest)| (p.as_str(), rest));
    let install = CommandSpec::new(
        program,
        prefix.iter().chain(&config.system_packages).cloned(),
    );

    let rime_dir = config.rime_config_dir();
    let plum_dir = config.plum_dir();

    let clone = CommandSpec::new(
        config.plum.git.clone(),
        [
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            config.plum.repository.clone(),
            crate::domain::config::PLUM_DIR.to_string(),
        ],
    )
    .in_dir(&config.workspace_dir);

    let schema = CommandSpec::new(
        "bash",
        std::iter::once("rime-install".to_string()).chain(config.plum.recipe.iter().cloned()),
    )
    .in_dir(&plum_dir);

    PackagePlan {
        package: Package::Rime,
        steps: vec![
            StepPlan {
                step: Step::IbusRime,
                description: format!("installing {}", config.system_packages.join(" ")),
                artifact: None,
                create: vec![Action::Run(install)],
                follow_up: Vec::new(),
            },
            StepPlan {
                step: Step::ConfigPath,
                description: format!("creating directory {}", rime_dir.display()),
                artifact: Some(rime_dir.clone()),
                create: vec![Action::CreateDir(rime_dir)],
                follow_up: Vec::new(),
            },
            StepPlan {
                step: Step::Plum,
                description: "installing plum and the rime schema".to_string(),
                artifact: Some(plum_dir),
                create: vec![
                    Action::CreateDir(config.workspace_dir.clone()),
                    Action::Run(clone),
                ],
                follow_up: vec![Action::Run(schema)],
            },
        ],
    }
}
