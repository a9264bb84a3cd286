//! # Cumulus Bundle Command (`commands::bundle`)
//!
//! File: cli/src/commands/bundle/mod.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module implements the `cumulus bundle` command: it builds every
//! bundle configured for the selected environment and publishes the
//! resulting artifacts to the environment's bucket.
//!
//! ## Architecture
//!
//! The command flow follows these steps:
//! 1. Parse command arguments (environment name, optional config path).
//! 2. Load the Cumulus configuration and resolve the environment.
//! 3. Open the environment's bucket.
//! 4. For each bundle, in the environment's configured order:
//!    run the pre-bundle hook, build the archive, run the post-bundle hook,
//!    upload the artifact.
//! 5. After all bundles succeed, publish the bundle-handler script once.
//!
//! Processing is strictly sequential and fail-fast: a hook, build, or
//! upload failure aborts the run immediately, skipping remaining bundles
//! and the handler upload. Nothing is retried and nothing is rolled back;
//! re-running overwrites the prior artifacts.
//!
//! ## Examples
//!
//! ```bash
//! # Build and publish everything configured for production
//! cumulus bundle --environment production
//!
//! # Use an explicit configuration file
//! cumulus bundle -e staging -c deploy/cumulus.toml
//! ```
//!
use crate::common::{archive, storage};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use hooks::Phase;
use object_store::ObjectStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Executes the pre/post shell hooks attached to a bundle.
pub mod hooks;

/// # Bundle Command Arguments (`BundleArgs`)
///
/// Defines the command-line arguments accepted by the `cumulus bundle`
/// command.
#[derive(Parser, Debug)]
pub struct BundleArgs {
    /// Name of the target environment, as defined in the configuration.
    #[arg(short, long)]
    environment: String,

    /// Optional: path to the configuration file. Defaults to the standard
    /// lookup (cumulus.toml in the current directory or an ancestor, then
    /// the user configuration directory).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// # Handle Bundle Command (`handle_bundle`)
///
/// The main handler for `cumulus bundle`. Loads the configuration, opens
/// the environment's bucket, and runs the bundling pipeline against the
/// current working directory.
pub async fn handle_bundle(args: BundleArgs) -> Result<()> {
    info!("Handling bundle command...");
    debug!("Bundle args: {:?}", args);

    let cfg = config::load_config(args.config.as_deref())
        .context("Failed to load cumulus configuration")?;
    let store = {
        let environment = cfg.environment(&args.environment)?;
        storage::connect(&environment.bucket)?
    };
    let workdir = std::env::current_dir().context("Failed to get current directory")?;

    run_pipeline(&cfg, &args.environment, store.as_ref(), &workdir).await
}

/// Build and publish every bundle configured for `environment_name`.
///
/// For each bundle, in configured order: pre-bundle hook, archive build,
/// post-bundle hook, artifact upload. After all bundles succeed, the
/// bundle-handler script is published exactly once. Any failure propagates
/// immediately and aborts the rest of the run.
pub async fn run_pipeline(
    cfg: &Config,
    environment_name: &str,
    store: &dyn ObjectStore,
    workdir: &Path,
) -> Result<()> {
    let environment = cfg.environment(environment_name)?;

    for bundle_name in &environment.bundles {
        let bundle = cfg.bundle(bundle_name)?;
        info!("Building bundle {}", bundle_name);
        debug!("Bundle paths: {}", bundle.paths.join(", "));

        hooks::run_hook(Phase::Pre, bundle_name, bundle.pre_bundle_hook.as_deref())?;

        let artifact = archive::tar::build_bundle(
            workdir,
            bundle_name,
            environment_name,
            &environment.version,
            &bundle.paths,
            &bundle.path_rewrites,
        )?;

        hooks::run_hook(Phase::Post, bundle_name, bundle.post_bundle_hook.as_deref())?;

        storage::upload_file(store, environment_name, &environment.version, &artifact).await?;
    }

    storage::upload_bundle_handler(store, environment_name, &environment.version).await?;

    Ok(())
}
