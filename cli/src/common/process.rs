//! # Cumulus Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module wraps `std::process::Command` for running operator-supplied
//! shell commands. Commands run through `sh -c`, inherit the current
//! environment, working directory, and standard streams, and block until the
//! child process exits. Only the exit status is inspected; interpreting it is
//! left to the caller.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::process::{Command, ExitStatus};

/// Run a command string through the shell and wait for it to finish.
///
/// The child inherits stdin/stdout/stderr, so whatever the command prints
/// goes straight to the terminal. Returns the child's exit status; a
/// non-zero status is not an error at this level.
pub fn run_shell(command: &str) -> Result<ExitStatus> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .with_context(|| format!("Failed to execute command: \"{}\"", command))?;
    Ok(status)
}
