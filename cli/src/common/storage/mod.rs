//! # Cumulus Object Storage Utilities (`common::storage`)
//!
//! File: cli/src/common/storage/mod.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module publishes finished artifacts to the object store. Every
//! upload lands under the `{environment}/{version}/` namespace of the
//! configured bucket: one key per bundle archive, plus the fixed
//! bundle-handler script that is published once per run.
//!
//! ## Architecture
//!
//! The module is built on the `object_store` crate:
//!
//! - `connect` opens the configured S3 bucket, with credentials and region
//!   taken from the environment.
//! - Upload functions take `&dyn ObjectStore`, so tests substitute the
//!   crate's in-memory backend and never touch the network.
//! - Puts use replace semantics: an existing object at the key is
//!   overwritten.
//! - Nothing is retried; a transport or auth failure propagates and is
//!   fatal to the run.
//!
use crate::core::error::{CumulusError, Result};
use anyhow::{anyhow, Context};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Remote filename of the companion script published once per run.
pub const BUNDLE_HANDLER_FILENAME: &str = "cumulus-bundle-handler.sh";

/// The companion script itself, shipped inside the binary.
const BUNDLE_HANDLER_SCRIPT: &[u8] = include_bytes!("../../../assets/cumulus-bundle-handler.sh");

/// Open the configured bucket. Credentials, region, and endpoint come from
/// the process environment (`AWS_*` variables).
pub fn connect(bucket: &str) -> Result<Arc<dyn ObjectStore>> {
    let store = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .build()
        .map_err(|e| {
            anyhow!(CumulusError::Upload(format!(
                "Failed to open bucket '{}': {}",
                bucket, e
            )))
        })?;
    Ok(Arc::new(store))
}

/// Remote key for a file published for one environment and version.
pub fn remote_key(environment: &str, version: &str, file_name: &str) -> String {
    format!("{}/{}/{}", environment, version, file_name)
}

/// Publish a local file under the environment/version namespace.
///
/// The object key is derived from the file's base name. An existing object
/// at the key is replaced.
pub async fn upload_file(
    store: &dyn ObjectStore,
    environment: &str,
    version: &str,
    local_path: &Path,
) -> Result<()> {
    let file_name = local_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            anyhow!(CumulusError::Upload(format!(
                "'{}' has no file name",
                local_path.display()
            )))
        })?;
    let key = remote_key(environment, version, &file_name);

    info!("Starting upload of {}", file_name);
    let data = tokio::fs::read(local_path)
        .await
        .with_context(|| format!("Failed to read '{}'", local_path.display()))?;
    store
        .put(&ObjectPath::from(key.as_str()), PutPayload::from(data))
        .await
        .map_err(|e| {
            anyhow!(CumulusError::Upload(format!(
                "Failed to upload '{}': {}",
                file_name, e
            )))
        })?;
    info!("Completed upload of {}", file_name);

    Ok(())
}

/// Publish the bundle-handler script for one environment and version.
pub async fn upload_bundle_handler(
    store: &dyn ObjectStore,
    environment: &str,
    version: &str,
) -> Result<()> {
    info!("Uploading the {} script", BUNDLE_HANDLER_FILENAME);
    let key = remote_key(environment, version, BUNDLE_HANDLER_FILENAME);
    store
        .put(
            &ObjectPath::from(key.as_str()),
            PutPayload::from_static(BUNDLE_HANDLER_SCRIPT),
        )
        .await
        .map_err(|e| {
            anyhow!(CumulusError::Upload(format!(
                "Failed to upload '{}': {}",
                BUNDLE_HANDLER_FILENAME, e
            )))
        })?;
    Ok(())
}
