//! # ggdk Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces every command relies on.
//!
//! - **`config`**: loads `gdk-config.json` and discovers the component recipe (`ProjectConfig`).
//! - **`error`**: the `GdkError` taxonomy and the crate-wide `Result` alias.
//! - **`local_config`**: resolves the deployment target and staging layout (`LocalDeployConfig`).
//!

/// Project configuration loading.
pub mod config;
/// Error types and the `Result` alias.
pub mod error;
/// Target resolution for the local commands.
pub mod local_config;
