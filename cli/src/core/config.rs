//! # Cumulus Configuration System
//!
//! File: cli/src/core/config.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module implements the configuration system for Cumulus, handling
//! loading, validation, and access to the environment and bundle definitions
//! that drive a bundling run. The rest of the application treats the loaded
//! `Config` as a plain lookup structure: which bundles an environment builds,
//! which paths and rewrites each bundle uses, and which hooks surround it.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from a single TOML file, located in order of
//!   precedence
//! - Configured bundle paths are expanded (e.g., `~` to home directory)
//! - Configuration is validated for consistency before use
//! - Structured data models ensure type safety
//!
//! Configuration file locations (in order of precedence):
//! 1. An explicit path passed on the command line (`--config`)
//! 2. A `cumulus.toml` in the current directory or one of its ancestors
//! 3. The user-specific `~/.config/cumulus/config.toml`
//!
//! ## Examples
//!
//! A minimal configuration file:
//!
//! ```toml
//! [environments.production]
//! version = "1.2.3"
//! bucket = "com-example-bundles"
//! bundles = ["web", "worker"]
//!
//! [bundles.web]
//! paths = ["/app/src"]
//! pre-bundle-hook = "make build"
//!
//! [[bundles.web.path-rewrites]]
//! target = "config/"
//! destination = "etc/"
//! ```
//!
//! The configuration is loaded once per command execution and passed to the
//! modules that need it.
//!
use crate::core::error::{CumulusError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from a TOML file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in the TOML
pub struct Config {
    /// Deployment environments, keyed by name.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
    /// Bundle definitions, keyed by name.
    #[serde(default)]
    pub bundles: HashMap<String, BundleConfig>,
}

/// Configuration for one deployment environment.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Version string stamped into artifact names and remote keys.
    pub version: String,
    /// Object store bucket that receives the artifacts.
    pub bucket: String,
    /// Names of the bundles built for this environment. The list order is
    /// the order in which bundles are processed.
    #[serde(default)]
    pub bundles: Vec<String>,
}

/// Configuration for one bundle.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct BundleConfig {
    /// Filesystem paths whose contents enter the archive, in order.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Entry name rewrites, evaluated in order.
    #[serde(default)]
    pub path_rewrites: Vec<RewriteRule>,
    /// Shell command run before the archive is built.
    pub pre_bundle_hook: Option<String>,
    /// Shell command run after the archive is built.
    pub post_bundle_hook: Option<String>,
}

/// A single archive entry rename: entries whose current name starts with
/// `target` have the target substring replaced by `destination`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RewriteRule {
    pub target: String,
    pub destination: String,
}

impl Config {
    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig> {
        self.environments
            .get(name)
            .ok_or_else(|| anyhow!(CumulusError::EnvironmentNotFound { name: name.into() }))
    }

    /// Look up a bundle definition by name.
    pub fn bundle(&self, name: &str) -> Result<&BundleConfig> {
        self.bundles
            .get(name)
            .ok_or_else(|| anyhow!(CumulusError::BundleNotFound { name: name.into() }))
    }
}

const PROJECT_CONFIG_FILENAME: &str = "cumulus.toml";

/// Load the configuration, either from an explicit path or from the
/// standard locations, then expand and validate it.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    let config_path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => locate_config_file()?,
    };
    let mut config = load_config_from_path(&config_path)?;
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn locate_config_file() -> Result<PathBuf> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        return Ok(project_config_path);
    }
    if let Some(proj_dirs) = ProjectDirs::from("com", "Cumulus", "cumulus") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            return Ok(config_path);
        }
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
    } else {
        warn!("Could not determine user config directory.");
    }
    Err(anyhow!(CumulusError::Config(format!(
        "No configuration file found. Create a {} or pass --config.",
        PROJECT_CONFIG_FILENAME
    ))))
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.exists() && project_config.is_file() {
            return Ok(Some(project_config));
        }
        let git_dir = path.join(".git");
        if git_dir.exists() && git_dir.is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    debug!("Expanding paths in configuration...");
    for bundle in config.bundles.values_mut() {
        for path in &mut bundle.paths {
            *path = shellexpand::tilde(path).into_owned();
        }
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    for (env_name, environment) in &config.environments {
        if environment.version.is_empty() {
            return Err(anyhow!(CumulusError::Config(format!(
                "Environment '{}' has an empty version.",
                env_name
            ))));
        }
        if environment.bucket.is_empty() {
            return Err(anyhow!(CumulusError::Config(format!(
                "Environment '{}' has an empty bucket.",
                env_name
            ))));
        }
        for bundle_name in &environment.bundles {
            if !config.bundles.contains_key(bundle_name) {
                return Err(anyhow!(CumulusError::Config(format!(
                    "Environment '{}' lists bundle '{}', which is not defined.",
                    env_name, bundle_name
                ))));
            }
        }
    }
    for (bundle_name, bundle) in &config.bundles {
        if bundle.paths.is_empty() {
            return Err(anyhow!(CumulusError::Config(format!(
                "Bundle '{}' does not define any paths.",
                bundle_name
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_toml() -> &'static str {
        r#"
            [environments.production]
            version = "1.2.3"
            bucket = "com-example-bundles"
            bundles = ["web", "worker"]

            [bundles.web]
            paths = ["/app/src"]
            pre-bundle-hook = "make build"
            post-bundle-hook = "make clean"

            [[bundles.web.path-rewrites]]
            target = "config/"
            destination = "etc/"

            [bundles.worker]
            paths = ["/app/worker", "/app/shared"]
        "#
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let config: Config = toml::from_str(sample_toml()).expect("Failed to parse TOML");

        let env = config.environment("production").unwrap();
        assert_eq!(env.version, "1.2.3");
        assert_eq!(env.bucket, "com-example-bundles");
        assert_eq!(env.bundles, vec!["web", "worker"]);

        let web = config.bundle("web").unwrap();
        assert_eq!(web.paths, vec!["/app/src"]);
        assert_eq!(web.pre_bundle_hook.as_deref(), Some("make build"));
        assert_eq!(web.post_bundle_hook.as_deref(), Some("make clean"));
        assert_eq!(
            web.path_rewrites,
            vec![RewriteRule {
                target: "config/".into(),
                destination: "etc/".into(),
            }]
        );

        let worker = config.bundle("worker").unwrap();
        assert_eq!(worker.paths.len(), 2);
        assert!(worker.pre_bundle_hook.is_none());
        assert!(worker.path_rewrites.is_empty());
    }

    #[test]
    fn test_unknown_environment_and_bundle() {
        let config: Config = toml::from_str(sample_toml()).unwrap();
        let err = config.environment("staging").unwrap_err();
        assert!(err.to_string().contains("Environment 'staging'"));
        let err = config.bundle("db").unwrap_err();
        assert!(err.to_string().contains("Bundle 'db'"));
    }

    #[test]
    fn test_path_expansion() {
        let mut config: Config = toml::from_str(
            r#"
            [bundles.web]
            paths = ["~/app/src", "/absolute/path"]
            "#,
        )
        .unwrap();

        expand_config_paths(&mut config).unwrap();

        let home_dir = directories::BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(
            config.bundles["web"].paths[0],
            home_dir.join("app/src").to_string_lossy()
        );
        assert_eq!(config.bundles["web"].paths[1], "/absolute/path"); // Absolute path unchanged
    }

    #[test]
    fn test_validate_config_valid() {
        let config: Config = toml::from_str(sample_toml()).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_missing_bundle_definition() {
        let config: Config = toml::from_str(
            r#"
            [environments.production]
            version = "1.2.3"
            bucket = "bundles"
            bundles = ["web"]
            "#,
        )
        .unwrap();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("lists bundle 'web'"));
    }

    #[test]
    fn test_validate_config_bundle_without_paths() {
        let config: Config = toml::from_str(
            r#"
            [bundles.web]
            pre-bundle-hook = "make build"
            "#,
        )
        .unwrap();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("does not define any paths"));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("cumulus.toml");
        fs::write(&config_path, sample_toml()).unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert!(config.environment("production").is_ok());
    }

    #[test]
    fn test_load_config_rejects_unknown_fields() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("cumulus.toml");
        fs::write(
            &config_path,
            r#"
            [bundles.web]
            paths = ["/app/src"]
            unknown-key = true
            "#,
        )
        .unwrap();

        assert!(load_config(Some(&config_path)).is_err());
    }
}
