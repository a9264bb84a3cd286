//! # Cumulus Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Repository: https://github.com/cumulus-deploy/cumulus
//!
//! ## Overview
//!
//! This module serves as the root and organizational entry point for the
//! shared utility modules used throughout the Cumulus CLI. It aggregates
//! functionality related to cross-cutting concerns: archive construction,
//! external process execution, and object storage.
//!
//! By centralizing these utilities under the `common::` namespace, Cumulus
//! keeps command-specific logic (`commands::`) separate from core
//! infrastructure (`core::`).
//!
//! ## Architecture
//!
//! - **`archive`**: Archive entry filtering/rewriting and `.tar.bz2`
//!   construction. Includes the `transform` and `tar` submodules.
//! - **`process`**: Execution of operator-supplied shell commands.
//! - **`storage`**: Publishing finished artifacts to the object store.
//!

/// Utilities for building bundle archives (entry transforms, tar writing).
pub mod archive;
/// Utilities for executing external shell commands.
pub mod process;
/// Utilities for publishing files to the object store.
pub mod storage;
