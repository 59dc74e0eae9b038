//! # ggdk Component Local List Handler
//!
//! File: cli/src/commands/component/local_list.rs
//!
//! Implements `ggdk component local-list`, which prints the output of
//! `sudo <greengrass>/bin/greengrass-cli component list` run on the target.
//!
use super::load_current_project;
use crate::common::process::{CommandRunner, SystemRunner, DEFAULT_TIMEOUT};
use crate::common::remote::RemoteExecutor;
use crate::core::error::Result;
use crate::core::local_config::{DeployTarget, LocalDeployConfig, TargetOverrides};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "List the components running on a Greengrass core device")]
pub struct LocalListArgs {
    #[command(flatten)]
    pub target: TargetOverrides,
}

pub async fn handle_local_list(args: LocalListArgs) -> Result<()> {
    info!("Handling component local-list command with args: {:?}", args);
    let project = load_current_project()?;
    let config = LocalDeployConfig::resolve(&args.target, &project)?;
    let listing = list_components(config.target, Arc::new(SystemRunner)).await?;
    print!("{}", listing);
    Ok(())
}

/// Returns the device's component listing verbatim.
pub async fn list_components(target: DeployTarget, runner: Arc<dyn CommandRunner>) -> Result<String> {
    let argv = vec![
        "sudo".to_string(),
        target.greengrass_cli(),
        "component".to_string(),
        "list".to_string(),
    ];
    RemoteExecutor::new(target, runner)
        .run_remote(&argv, DEFAULT_TIMEOUT)
        .await
}
