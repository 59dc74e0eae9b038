//! # ggdk Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Aggregates the top-level command groups of the ggdk CLI so that `main.rs`
//! can route to them.
//!
//! ## Command Groups
//!
//! - `component`: build a component and deploy, list or remove it on a
//!   Greengrass core device without going through the cloud.
//!
//! Subcommands are declared inside their group's `mod.rs`, not here.
//!

/// Command group for component development. Includes `build`, `local-deploy`, `local-list`, `local-remove`.
pub mod component;
