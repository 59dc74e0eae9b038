//! # ggdk Component Build Handler
//!
//! File: cli/src/commands/component/build.rs
//!
//! Implements `ggdk component build`: loads the project and runs the
//! configured build system through `ProjectBuilder`. `local-deploy` runs the
//! same build itself, so this command is only needed to inspect the output.
//!
use super::load_current_project;
use crate::common::build::{ComponentBuilder, ProjectBuilder};
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Build the component artifacts and recipe")]
pub struct BuildArgs {}

pub async fn handle_build(args: BuildArgs) -> Result<()> {
    info!("Handling component build command with args: {:?}", args);
    let project = load_current_project()?;
    ProjectBuilder.build(&project).await?;
    println!(
        "Built '{}' into {}",
        project.component_name,
        project.gg_build_dir.display()
    );
    Ok(())
}
