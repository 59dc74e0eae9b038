//! # ggdk Component Local Remove Handler
//!
//! File: cli/src/commands/component/local_remove.rs
//!
//! Implements `ggdk component local-remove`: asks the device's
//! `greengrass-cli` to remove the project's component from the local
//! deployment. The recipe directory is the one `local-deploy` delivers to.
//!
use super::load_current_project;
use crate::common::process::{CommandRunner, SystemRunner, DEFAULT_TIMEOUT};
use crate::common::remote::RemoteExecutor;
use crate::core::error::Result;
use crate::core::local_config::{LocalDeployConfig, TargetOverrides};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Remove the component from a Greengrass core device")]
pub struct LocalRemoveArgs {
    #[command(flatten)]
    pub target: TargetOverrides,
}

pub async fn handle_local_remove(args: LocalRemoveArgs) -> Result<()> {
    info!("Handling component local-remove command with args: {:?}", args);
    let project = load_current_project()?;
    let config = LocalDeployConfig::resolve(&args.target, &project)?;
    remove_component(&config, Arc::new(SystemRunner)).await?;
    println!("Requested removal of {}", config.component_name);
    Ok(())
}

/// `sudo <greengrass>/bin/greengrass-cli deployment create --remove <name> --recipeDir <dir>/recipes`
pub async fn remove_component(
    config: &LocalDeployConfig,
    runner: Arc<dyn CommandRunner>,
) -> Result<()> {
    let argv = vec![
        "sudo".to_string(),
        config.target.greengrass_cli(),
        "deployment".to_string(),
        "create".to_string(),
        "--remove".to_string(),
        config.component_name.clone(),
        "--recipeDir".to_string(),
        format!("{}/recipes", config.delivery_dir()),
    ];
    RemoteExecutor::new(config.target.clone(), runner)
        .run_remote(&argv, DEFAULT_TIMEOUT)
        .await?;
    info!("Remove component request successful");
    Ok(())
}
