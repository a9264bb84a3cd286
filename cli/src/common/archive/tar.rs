//! # Cumulus Bundle Archive Writer (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module produces one compressed archive file for one bundle. It walks
//! the bundle's source paths, applies the entry decisions from
//! `common::archive::transform`, and writes the kept entries into a
//! bzip2-compressed tar file at the bundle's deterministic target path
//! `{workdir}/target/bundle-{environment}-{version}-{bundle}.tar.bz2`.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for building the archive structure,
//! the `bzip2` crate for compression, and `walkdir` for traversing source
//! paths:
//!
//! - Symbolic links are followed, so archive members are the resolved file
//!   contents rather than link records.
//! - Every entry is renamed by the transform rules and carries uid/gid 0 and
//!   "root"/"root" ownership, regardless of source filesystem ownership.
//! - An excluded directory is not descended into; its entire subtree stays
//!   out of the archive.
//! - Re-running with the same environment, version, and bundle name
//!   overwrites the prior artifact at the same path.
//!
//! Any filesystem or compression failure propagates to the caller and is
//! fatal for the run; there is no partial-success signal.
//!
use crate::common::archive::transform;
use crate::core::config::RewriteRule;
use crate::core::error::{CumulusError, Result};
use anyhow::{anyhow, Context};
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tar::{Builder, Header, HeaderMode};
use tracing::info;
use walkdir::WalkDir;

/// Local artifact path for a bundle. A pure function of the working
/// directory, environment, version, and bundle name.
pub fn bundle_archive_path(
    workdir: &Path,
    environment: &str,
    version: &str,
    bundle_name: &str,
) -> PathBuf {
    workdir.join("target").join(format!(
        "bundle-{}-{}-{}.tar.bz2",
        environment, version, bundle_name
    ))
}

/// Build the archive for one bundle and return its local path.
///
/// ## Arguments
///
/// * `workdir` - Directory under which the `target/` output directory lives.
/// * `bundle_name` - Name of the bundle being built.
/// * `environment` - Selected environment; gates entry exclusion and marker
///   stripping.
/// * `version` - Version stamped into the artifact filename.
/// * `paths` - Source paths whose contents enter the archive, in order.
/// * `rewrites` - Entry renames, evaluated in configured order.
///
/// ## Errors
///
/// Returns an `Err` if the output directory cannot be created, the archive
/// file cannot be opened, any source entry cannot be read, or finalizing the
/// tar structure or compression stream fails.
pub fn build_bundle(
    workdir: &Path,
    bundle_name: &str,
    environment: &str,
    version: &str,
    paths: &[String],
    rewrites: &[RewriteRule],
) -> Result<PathBuf> {
    let archive_path = bundle_archive_path(workdir, environment, version, bundle_name);

    // Ensure that the bundle target directory exists.
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create target directory '{}'", parent.display())
        })?;
    }

    let file = File::create(&archive_path).map_err(|e| {
        anyhow!(CumulusError::Archive(format!(
            "Failed to create '{}': {}",
            archive_path.display(),
            e
        )))
    })?;
    let encoder = BzEncoder::new(file, Compression::best());
    let mut builder = Builder::new(encoder);

    for path in paths {
        append_source_tree(&mut builder, Path::new(path), environment, rewrites)
            .with_context(|| {
                format!("Failed to add '{}' to bundle '{}'", path, bundle_name)
            })?;
    }

    let encoder = builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    encoder
        .finish()
        .context("Failed to finish bzip2 compression stream")?;

    info!("Wrote bundle to {}", archive_path.display());
    Ok(archive_path)
}

/// Walk one source path and append its kept entries to the archive.
fn append_source_tree<W: Write>(
    builder: &mut Builder<W>,
    source: &Path,
    environment: &str,
    rewrites: &[RewriteRule],
) -> Result<()> {
    let root = transform::archive_root_name(source);

    let mut walker = WalkDir::new(source).follow_links(true).into_iter();
    while let Some(entry_result) = walker.next() {
        let entry = entry_result
            .with_context(|| format!("Failed to access entry under '{}'", source.display()))?;

        if transform::is_excluded(entry.path(), environment) {
            // Exclusion covers the whole subtree.
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        let raw_name = transform::raw_entry_name(entry.path());
        let name = transform::rewrite_entry_name(&raw_name, &root, rewrites, environment);
        if name.is_empty() {
            // The walked root itself; tar cannot represent an empty name.
            continue;
        }

        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata for '{}'", entry.path().display()))?;

        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(&metadata, HeaderMode::Complete);
        transform::normalize_ownership(&mut header)
            .context("Failed to set archive entry ownership")?;

        if metadata.is_dir() {
            builder
                .append_data(&mut header, &name, io::empty())
                .with_context(|| format!("Failed to append directory '{}'", name))?;
        } else {
            // Opening by path resolves symlinks, so members carry the target
            // file's contents.
            let file = File::open(entry.path())
                .with_context(|| format!("Failed to open '{}'", entry.path().display()))?;
            builder
                .append_data(&mut header, &name, file)
                .with_context(|| format!("Failed to append file '{}'", name))?;
        }
    }

    Ok(())
}
