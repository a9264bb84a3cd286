//! # Cumulus Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module is the organizational unit for bundle-archive construction.
//! Building a bundle is a two-phase problem: deciding, for every filesystem
//! entry under a bundle's source paths, whether it enters the archive and
//! under what name, and then writing the kept entries into a compressed
//! tar archive.
//!
//! ## Architecture
//!
//! - **`transform`**: Pure entry decisions. Exclusion of entries tagged for
//!   other environments, root-prefix stripping, configured renames, tag
//!   stripping, and ownership normalization. No filesystem access, which
//!   keeps the rules independently testable.
//! - **`tar`**: The archive writer. Walks each source path, consults
//!   `transform` for every entry, and streams the kept entries into a
//!   `.tar.bz2` file at the bundle's deterministic target path.
//!

pub mod tar;
pub mod transform;
