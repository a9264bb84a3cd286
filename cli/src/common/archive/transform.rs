//! # Cumulus Archive Entry Transform (`common::archive::transform`)
//!
//! File: cli/src/common/archive/transform.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! Pure decision logic for archive entries. For every filesystem object
//! visited while a bundle is built, this module decides whether the entry is
//! excluded, and if not, what name it receives inside the archive and what
//! ownership metadata it carries.
//!
//! Files and directories can be scoped to a single deployment environment
//! with a reserved marker of the form `__cumulus-<environment>__` in their
//! name. A file carrying the marker of the selected environment is kept and
//! the marker is stripped from its archive name; a file carrying any other
//! environment's marker is excluded.
//!
//! ## Architecture
//!
//! Two independent checks and one rename pipeline:
//!
//! - `is_excluded` inspects the entry's path as it exists in the source
//!   tree, before any renaming. It has a filename branch (marker-prefixed
//!   basenames) and a directory branch (a path component equal to the
//!   selected environment's marker). The two branches deliberately use
//!   different matching: the filename branch keeps an entry whose basename
//!   contains the selected marker exactly once, while the directory branch
//!   excludes on exact component equality.
//! - `rewrite_entry_name` maps a kept entry's raw name to its archive name:
//!   root-prefix strip, configured rewrites in order, marker strip.
//! - `normalize_ownership` pins every entry to uid/gid 0 and "root"/"root",
//!   regardless of source filesystem ownership.
//!
//! None of these functions touch the filesystem, and none of them fail the
//! build: a rewrite rule that does not match is simply skipped.
//!
use crate::core::config::RewriteRule;
use std::io;
use std::path::Path;
use tracing::debug;

/// Leading marker shared by all environment-scoped names.
pub const RESERVED_TAG_PREFIX: &str = "__cumulus-";

/// The full marker for one environment, e.g. `__cumulus-production__`.
pub fn environment_tag(environment: &str) -> String {
    format!("{}{}__", RESERVED_TAG_PREFIX, environment)
}

/// Decide whether a source entry stays out of the archive.
///
/// The path is inspected as it exists in the source tree, before any
/// renaming:
/// - If the basename starts with the reserved marker prefix, the entry is
///   kept only when the basename contains the selected environment's marker
///   exactly once (the marker is stripped later by `rewrite_entry_name`).
///   Any other marker-prefixed basename is scoped to a different
///   environment and is excluded.
/// - Otherwise, the entry is excluded when any directory component of the
///   path equals the selected environment's marker literally.
/// - Otherwise the entry is kept.
///
/// Callers must not descend into an excluded directory: exclusion covers
/// the entire subtree.
pub fn is_excluded(path: &Path, environment: &str) -> bool {
    let tag = environment_tag(environment);
    let basename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if basename.starts_with(RESERVED_TAG_PREFIX) {
        // Kept only when the selected marker occurs exactly once.
        if basename.split(tag.as_str()).count() == 2 {
            return false;
        }
        debug!("Excluding file {}", path.display());
        return true;
    }

    if path
        .components()
        .any(|component| component.as_os_str().to_string_lossy() == tag)
    {
        debug!("Excluding file {}", path.display());
        return true;
    }

    false
}

/// Raw archive name for a source entry: its path without the leading
/// separator, mirroring how entries are named relative to the archive walk.
pub fn raw_entry_name(path: &Path) -> String {
    path.to_string_lossy().trim_start_matches('/').to_string()
}

/// Archive-name form of a source root: leading and trailing separators
/// trimmed, so it can be removed from entry names with and without a
/// trailing separator.
pub fn archive_root_name(path: &Path) -> String {
    path.to_string_lossy().trim_matches('/').to_string()
}

/// Map a kept entry's raw name to its final archive name.
///
/// Applied in order:
/// 1. Root-prefix strip: occurrences of `<root>/` and `<root>` are removed,
///    so entries end up rooted at the archive root rather than under the
///    source directory's own path.
/// 2. Configured rewrites: each rule whose target is a prefix of the
///    current name replaces the target substring with its destination
///    (string-replace semantics). Rules are evaluated in configured order
///    against the name as left by the previous step; non-matching rules are
///    skipped silently.
/// 3. Marker strip: any occurrence of the selected environment's marker is
///    removed, un-tagging the selected environment's variant.
pub fn rewrite_entry_name(
    raw_name: &str,
    root: &str,
    rewrites: &[RewriteRule],
    environment: &str,
) -> String {
    let mut name = raw_name
        .replace(&format!("{}/", root), "")
        .replace(root, "");

    for rewrite in rewrites {
        if name.starts_with(&rewrite.target) {
            name = name.replace(&rewrite.target, &rewrite.destination);
            debug!("Replaced {} with {}", rewrite.target, rewrite.destination);
        }
    }

    name.replace(&environment_tag(environment), "")
}

/// Pin an archive entry's ownership to uid/gid 0 and "root"/"root".
pub fn normalize_ownership(header: &mut tar::Header) -> io::Result<()> {
    header.set_uid(0);
    header.set_gid(0);
    header.set_username("root")?;
    header.set_groupname("root")?;
    Ok(())
}
