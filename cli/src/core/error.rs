//! # ggdk Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout ggdk. Every stage of
//! the build and local deployment pipeline either completes or raises one of
//! these errors; nothing is swallowed on the way up to `main`.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `GdkError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error kinds cover:
//! - Invalid or contradictory local deployment configuration (`Config`)
//! - Unreadable or ambiguous project configuration (`ProjectConfig`)
//! - Failed or timed-out ssh/scp/greengrass-cli invocations (`Transport`)
//! - Recipe validation failures (`RecipeTooLarge`, `RecipeInvalid`, `SchemaInvalid`)
//! - Component build failures (`Build`)
//!
//! ## Examples
//!
//! ```rust
//! // Raise a typed error
//! bail!(GdkError::Config("SSH host configuration is required for remote command.".into()));
//!
//! // Branch on a kind
//! if let Some(GdkError::Transport { cmd, .. }) = err.downcast_ref::<GdkError>() {
//!     eprintln!("Re-run manually: {}", cmd);
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for ggdk.
#[derive(Error, Debug)]
pub enum GdkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project configuration error: {0}")]
    ProjectConfig(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    /// Any non-zero exit, timeout or spawn failure of an external command.
    /// `cmd` is the full command line joined by spaces.
    #[error("Command failed: {cmd} ({reason})")]
    Transport { cmd: String, reason: String },

    #[error("The build updated recipe file is too big with a size of {size} bytes.")]
    RecipeTooLarge { size: u64 },

    #[error("Project recipe file '{path}' is invalid. Please correct its format and try again. Error: {message}")]
    RecipeInvalid { path: PathBuf, message: String },

    #[error("Recipe schema is invalid: {0}")]
    SchemaInvalid(String),

    #[error("Failed to build the component: {0}")]
    Build(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
