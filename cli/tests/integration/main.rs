//! Integration tests for rime-provision
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Every test writes its own config file into a temp dir so nothing under
//! the real home directory is touched.

mod cli_tests;
mod fixture;
mod status_command;
