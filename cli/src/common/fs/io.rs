//! # ggdk Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the basic filesystem operations used by the build
//! and staging steps. The functions are thin wrappers around `std::fs` that
//! add context to errors:
//! - **`ensure_dir_exists`**: creates a directory and its parents (like `mkdir -p`), failing if the path is a file.
//! - **`clean_dir`**: removes a directory tree if present and recreates it empty.
//! - **`dir_has_entries`**: whether a directory exists and contains anything.
//! - **`read_file_to_string`** / **`write_string_to_file`**: whole-file text I/O.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::clean_dir(&config.staging_root)?;
//! io::ensure_dir_exists(&config.staging_recipes_root)?;
//! if io::dir_has_entries(&artifacts_dir)? { /* pass --artifactDir */ }
//! ```
//!
use crate::core::error::{GdkError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist it is created along with any missing parents.
/// If the path exists but is not a directory, `GdkError::FileSystem` is returned.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(GdkError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Removes `path` and everything below it, then recreates it empty.
pub fn clean_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("Removing directory {:?}", path);
        fs::remove_dir_all(path).with_context(|| format!("Failed to remove directory {:?}", path))?;
    }
    ensure_dir_exists(path)
}

/// `true` when `path` is a directory with at least one entry.
pub fn dir_has_entries(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(path).with_context(|| format!("Failed to read directory {:?}", path))?;
    Ok(entries.next().is_some())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes string content to a file, overwriting it and creating the parent
/// directory if needed.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote content to file: {:?}", path);
    Ok(())
}
