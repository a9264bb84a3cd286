//! # Cumulus CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module provides shared utility functions used across the integration
//! test files in `cli/tests/`. Each other `.rs` file in that directory is
//! compiled as a separate test crate linked against the `cumulus` binary.
//!

// Allow potentially unused code in this common module, as different test
// files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// Create an `assert_cmd::Command` pointing at the compiled `cumulus`
/// binary target for the current test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn cumulus_cmd() -> Command {
    Command::cargo_bin("cumulus").expect("Failed to find cumulus binary for testing")
}
