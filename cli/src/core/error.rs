//! # Cumulus Error Types
//!
//! File: cli/src/core/error.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout the Cumulus application. It provides a consistent approach to
//! error management with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CumulusError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover the stages of a bundling run:
//! - Configuration lookup errors
//! - Hook command failures
//! - Archive construction failures
//! - Upload failures
//!
//! Every error is fatal to the run: nothing is retried, and `main.rs`
//! terminates the process with a non-zero exit code when one propagates.
//!
use thiserror::Error;

/// Custom error type for the Cumulus application.
#[derive(Error, Debug)]
pub enum CumulusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment '{name}' is not defined in the configuration.")]
    EnvironmentNotFound { name: String },

    #[error("Bundle '{name}' is not defined in the configuration.")]
    BundleNotFound { name: String },

    #[error("The {phase}-bundle-hook returned a non-zero exit code: {status} (command: \"{command}\")")]
    Hook {
        phase: String,
        command: String,
        status: i32,
    },

    #[error("Archive construction failed: {0}")]
    Archive(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = CumulusError::Config("Missing setting 'bucket'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'bucket'"
        );

        let env_not_found = CumulusError::EnvironmentNotFound {
            name: "staging".into(),
        };
        assert_eq!(
            env_not_found.to_string(),
            "Environment 'staging' is not defined in the configuration."
        );

        let hook_err = CumulusError::Hook {
            phase: "pre".into(),
            command: "make build".into(),
            status: 2,
        };
        assert_eq!(
            hook_err.to_string(),
            "The pre-bundle-hook returned a non-zero exit code: 2 (command: \"make build\")"
        );
    }
}
