//! # Cumulus Main Entry Point
//!
//! File: cli/src/main.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Cumulus CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! The application follows a modular command structure:
//! - Each top-level command is defined as a variant in the `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! Basic Cumulus usage:
//!
//! ```bash
//! # Get help
//! cumulus --help
//!
//! # Build and publish all bundles for the production environment
//! cumulus bundle --environment production
//!
//! # Same, with debug logging
//! cumulus -v bundle -e production
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler
//! 4. Format and display any errors that occur, exiting non-zero
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Handles specific command logic (bundle).
mod common; // Contains shared utilities (archive, process, storage).
mod core; // Core infrastructure (errors, configuration).

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cumulus",
    about = "☁️ Cumulus: environment-scoped deployment bundling and publishing",
    long_about = "Packages configured filesystem paths into versioned, environment-scoped\n\
                  archives and publishes them to the configured object store bucket.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "b")]
    Bundle(commands::bundle::BundleArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Bundle(args) => commands::bundle::handle_bundle(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    fn cumulus_cmd() -> Command {
        Command::cargo_bin("cumulus").expect("Failed to find cumulus binary for testing")
    }
    #[test]
    fn test_main_help_flag() {
        cumulus_cmd().arg("--help").assert().success();
    }
    #[test]
    fn test_main_version_flag() {
        cumulus_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
    #[test]
    fn test_bundle_requires_environment() {
        cumulus_cmd().arg("bundle").assert().failure();
    }
}
