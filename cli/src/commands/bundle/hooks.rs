//! # Cumulus Bundle Hooks (`commands::bundle::hooks`)
//!
//! File: cli/src/commands/bundle/hooks.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! Runs the operator-defined shell command attached to a bundle at a named
//! phase. A bundle without a command for the phase is a no-op. A command
//! that exits non-zero is fatal: the error names the phase and the exact
//! command, and the caller terminates the run.
//!
use crate::common::process;
use crate::core::error::{CumulusError, Result};
use std::fmt;
use tracing::{debug, info};

/// Phase at which a bundle hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pre,
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pre => write!(f, "pre"),
            Phase::Post => write!(f, "post"),
        }
    }
}

/// Run the hook configured for `bundle_name` at `phase`, if any.
///
/// The command runs synchronously through the shell, inheriting the current
/// environment and working directory. A non-zero exit status maps to
/// `CumulusError::Hook`.
pub fn run_hook(phase: Phase, bundle_name: &str, command: Option<&str>) -> Result<()> {
    let Some(command) = command else {
        debug!("No {}-bundle-hook configured for '{}'", phase, bundle_name);
        return Ok(());
    };

    info!("Running {}-bundle-hook command: \"{}\"", phase, command);
    let status = process::run_shell(command)?;
    if !status.success() {
        return Err(CumulusError::Hook {
            phase: phase.to_string(),
            command: command.to_string(),
            status: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(())
}
