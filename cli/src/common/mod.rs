//! # ggdk Common Utilities
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers in `commands/`.
//!
//! ## Architecture
//!
//! - `build`: the component build collaborator (`ComponentBuilder`, `ProjectBuilder`)
//! - `fs`: directory cleaning, copying and whole-file I/O
//! - `process`: the `CommandRunner` seam over external processes, with timeouts
//! - `recipe`: recipe reading/writing, local deploy transformation and validation
//! - `remote`: `RemoteExecutor`, running commands locally or over ssh/scp
//!

pub mod build;
pub mod fs;
pub mod process;
pub mod recipe;
pub mod remote;
