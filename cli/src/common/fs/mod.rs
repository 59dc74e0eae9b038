//! # ggdk Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the build and local deploy steps.
//!
//! - **`copy`**: recursive copies (`copy_dir_contents` via `fs_extra`, `copy_tree_filtered` via `walkdir`).
//! - **`io`**: directory creation and cleaning, emptiness checks and whole-file text I/O.
//!
//! Callers import the submodule they need, e.g. `crate::common::fs::io::clean_dir`.
//!

/// Recursive directory copies.
pub mod copy;
/// Basic file I/O (`ensure_dir_exists`, `clean_dir`, `read_file_to_string`, ...).
pub mod io;
