//! Unit tests for rime-provision
//!
//! These tests use mocked ports and run fast without external I/O.

mod property_tests;
mod step_runner;
