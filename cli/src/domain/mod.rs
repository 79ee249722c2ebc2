//! Domain layer: pure types, validation and planning.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod plan;
pub mod state;

pub use config::{ConfigFile, HostDirs, Overrides, ProvisionConfig};
pub use error::{ConfigError, ProvisionError, StateFormatError};
pub use plan::{Action, CommandSpec, PackagePlan, StepPlan};
pub use state::{InstallationState, Package, Step};
