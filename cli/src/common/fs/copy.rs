//! # ggdk Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! Recursive copies used when staging build output:
//! - `copy_dir_contents` copies what is *inside* a directory into a target,
//!   used for `greengrass-build/artifacts/...` into the staged version folder.
//! - `copy_tree_filtered` copies a project tree while skipping top-level
//!   entries by name, used to prepare the zip build sources.
//!
//! Both overwrite existing files in the target. Directory copying uses the
//! `fs_extra` crate; the filtered walk uses `walkdir`.
//!
use crate::core::error::Result;
use crate::common::fs::io::ensure_dir_exists;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Copies the contents of `source` into `target`, creating `target` if needed.
pub fn copy_dir_contents(source: &Path, target: &Path) -> Result<()> {
    info!("Copying {:?} into {:?}", source, target);
    ensure_dir_exists(target)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;

    fs_extra::dir::copy(source, target, &options).map_err(|e| {
        anyhow::anyhow!(e).context(format!("Failed to copy dir {:?} to {:?}", source, target))
    })?;
    debug!("Finished copying {:?} into {:?}", source, target);
    Ok(())
}

/// Copies `source` into `target`, skipping top-level entries for which
/// `exclude(name)` returns true. Symlinks are followed.
pub fn copy_tree_filtered<F>(source: &Path, target: &Path, exclude: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    info!("Copying project tree {:?} to {:?}", source, target);
    ensure_dir_exists(target)?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() != 1 || !exclude(&entry.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", source))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{:?} is not below {:?}", entry.path(), source))?;
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            ensure_dir_exists(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                ensure_dir_exists(parent)?;
            }
            fs::copy(entry.path(), &destination).with_context(|| {
                format!("Failed to copy {:?} to {:?}", entry.path(), destination)
            })?;
        }
    }
    Ok(())
}
