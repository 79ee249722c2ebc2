//! Command implementations

pub mod install;
pub mod status;
