//! # ggdk Component Command Group
//!
//! File: cli/src/commands/component/mod.rs
//!
//! ## Overview
//!
//! Entry point and router for `ggdk component`. All subcommands operate on the
//! component project in the current directory (the directory holding
//! `gdk-config.json` and the recipe).
//!
//! ## Architecture
//!
//! - `ComponentArgs`: top-level arguments struct for the group.
//! - `ComponentCommand`: the subcommands.
//! - `handle_component`: matches the subcommand and calls its handler.
//!
//! The three `local-*` subcommands share the target flags
//! (`TargetOverrides`) and talk to the device through `RemoteExecutor`.
//!
//! ## Examples
//!
//! ```bash
//! # Build into greengrass-build/
//! ggdk component build
//!
//! # Deploy to the Greengrass core running on this machine
//! ggdk component local-deploy
//!
//! # Deploy to a device over SSH
//! ggdk component local-deploy --host 192.168.1.20 --user pi --key-file ~/.ssh/id_rsa
//!
//! # Show or remove what is deployed
//! ggdk component local-list --host 192.168.1.20 --user pi
//! ggdk component local-remove --host 192.168.1.20 --user pi
//! ```
//!
use crate::core::config::ProjectConfig;
use crate::core::error::Result;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::env;

/// Implements `ggdk component build`.
mod build;
/// Implements `ggdk component local-deploy`.
mod local_deploy;
/// Implements `ggdk component local-list`.
mod local_list;
/// Implements `ggdk component local-remove`.
mod local_remove;

/// # Component Command Group Arguments (`ComponentArgs`)
#[derive(Parser, Debug)]
pub struct ComponentArgs {
    #[command(subcommand)]
    command: ComponentCommand,
}

#[derive(Subcommand, Debug)]
enum ComponentCommand {
    /// Build the component artifacts and recipe into greengrass-build/.
    Build(build::BuildArgs),
    /// Build and deploy the component to a Greengrass core device.
    LocalDeploy(local_deploy::LocalDeployArgs),
    /// List the components running on a Greengrass core device.
    LocalList(local_list::LocalListArgs),
    /// Remove the component from a Greengrass core device.
    LocalRemove(local_remove::LocalRemoveArgs),
}

/// Routes `ggdk component <subcommand>` to its handler.
pub async fn handle_component(args: ComponentArgs) -> Result<()> {
    match args.command {
        ComponentCommand::Build(args) => build::handle_build(args).await,
        ComponentCommand::LocalDeploy(args) => local_deploy::handle_local_deploy(args).await,
        ComponentCommand::LocalList(args) => local_list::handle_local_list(args).await,
        ComponentCommand::LocalRemove(args) => local_remove::handle_local_remove(args).await,
    }
}

/// Loads the project in the current working directory.
fn load_current_project() -> Result<ProjectConfig> {
    let project_dir = env::current_dir().context("Failed to determine current directory")?;
    ProjectConfig::load(&project_dir)
}
