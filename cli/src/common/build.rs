//! # ggdk Component Build (`common::build`)
//!
//! File: cli/src/common/build.rs
//!
//! ## Overview
//!
//! Produces the component's artifacts and recipe under `greengrass-build/`
//! so that `local-deploy` can stage them. The `ComponentBuilder` trait is the
//! seam the deploy pipeline calls; `ProjectBuilder` is the real
//! implementation, driven by the project's build system:
//!
//! | build system | what happens |
//! |---|---|
//! | `zip` | project tree copied to `zip-build/<project-dir>/` (minus build dirs, config, recipe, dot entries, `excludes`) |
//! | `maven` | `mvn clean package`, then `target/*.jar` copied to the artifacts dir |
//! | `gradle` / `gradlew` | `gradle build` / `./gradlew build`, then `build/libs/*.jar` copied |
//! | `custom` | `custom_build_command` runs; it owns `greengrass-build/` |
//!
//! Except for `custom`, `greengrass-build/` is recreated first and the project
//! recipe is copied into `greengrass-build/recipes/`.
//!
use crate::common::fs::{copy, io};
use crate::common::recipe::Recipe;
use crate::core::config::{
    BuildSystem, ProjectConfig, BUILD_DIR_NAME, LOCAL_BUILD_DIR_NAME, NEXT_PATCH,
    PROJECT_CONFIG_FILENAME,
};
use crate::core::error::{GdkError, Result};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Stdio;
use tracing::{debug, error, info};

/// Builds the component so its output lands in the project's build directories.
#[async_trait]
pub trait ComponentBuilder: Send + Sync {
    async fn build(&self, project: &ProjectConfig) -> Result<()>;
}

/// Builds with the project's configured build system.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectBuilder;

#[async_trait]
impl ComponentBuilder for ProjectBuilder {
    async fn build(&self, project: &ProjectConfig) -> Result<()> {
        info!(
            "Building component '{}' with the '{}' build system.",
            project.component_name, project.build_system
        );

        let tool: Option<&[&str]> = match project.build_system {
            BuildSystem::Custom => {
                let command = project.custom_build_command.clone().unwrap_or_default();
                return run_build_tool(&command, &project.project_dir).await;
            }
            BuildSystem::Zip => None,
            BuildSystem::Maven => Some(&["mvn", "clean", "package"][..]),
            BuildSystem::Gradle => Some(&["gradle", "build"][..]),
            BuildSystem::GradleWrapper => Some(&["./gradlew", "build"][..]),
        };

        io::clean_dir(&project.gg_build_dir)?;
        io::ensure_dir_exists(&project.gg_build_component_artifacts_dir)?;
        io::ensure_dir_exists(&project.gg_build_recipes_dir)?;

        match tool {
            Some(tool) => {
                run_build_tool(&argv(tool), &project.project_dir).await?;
                collect_jars(project)?;
            }
            None => stage_zip_sources(project)?,
        }

        write_build_recipe(project)?;
        info!("Build of '{}' finished.", project.component_name);
        Ok(())
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// Runs a build tool in the project directory with inherited stdio, so the
/// user sees the tool's own progress output.
async fn run_build_tool(command: &[String], project_dir: &Path) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!(GdkError::Build("empty build command".into())))?;
    info!("Executing build command: {}", command.join(" "));

    let status = tokio::process::Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| {
            anyhow!(GdkError::Build(format!(
                "Failed to execute '{}': {}. Is it installed and in PATH?",
                program, e
            )))
        })?;

    if !status.success() {
        let exit_code = status.code().map_or("?".to_string(), |c| c.to_string());
        error!("Build command '{}' failed with exit code {}", command.join(" "), exit_code);
        return Err(anyhow!(GdkError::Build(format!(
            "'{}' exited with code {}",
            command.join(" "),
            exit_code
        ))));
    }
    Ok(())
}

fn zip_excludes(project: &ProjectConfig) -> Vec<String> {
    let mut excludes = vec![
        PROJECT_CONFIG_FILENAME.to_string(),
        BUILD_DIR_NAME.to_string(),
        LOCAL_BUILD_DIR_NAME.to_string(),
        "zip-build".to_string(),
        project.recipe_file_name(),
    ];
    if let Some(Value::Array(extra)) = project.build_options.get("excludes") {
        excludes.extend(extra.iter().filter_map(Value::as_str).map(str::to_string));
    }
    excludes
}

/// Recreates `zip-build/<project-dir-name>/` from the project tree.
fn stage_zip_sources(project: &ProjectConfig) -> Result<()> {
    let zip_build_dir = project.project_dir.join(project.build_system.build_folder().join("/"));
    let target = zip_build_dir.join(project.project_dir_name());
    io::clean_dir(&zip_build_dir)?;

    let excludes = zip_excludes(project);
    debug!("Zip build excludes: {:?}", excludes);
    copy::copy_tree_filtered(&project.project_dir, &target, |name| {
        name.starts_with('.') || excludes.iter().any(|excluded| excluded == name)
    })
    .context("Failed to prepare zip build sources")
}

/// Copies `*.jar` build outputs into the component artifacts directory.
fn collect_jars(project: &ProjectConfig) -> Result<()> {
    let output_dir = project.project_dir.join(project.build_system.build_folder().join("/"));
    let entries = fs::read_dir(&output_dir).map_err(|e| {
        anyhow!(GdkError::Build(format!(
            "Build output directory {:?} could not be read: {}",
            output_dir, e
        )))
    })?;

    let mut copied = 0;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jar") {
            if let Some(name) = path.file_name() {
                let destination = project.gg_build_component_artifacts_dir.join(name);
                fs::copy(&path, &destination)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", path, destination))?;
                copied += 1;
            }
        }
    }
    if copied == 0 {
        return Err(anyhow!(GdkError::Build(format!(
            "No .jar files found in {:?}",
            output_dir
        ))));
    }
    info!("Copied {} build artifact(s).", copied);
    Ok(())
}

/// Copies the project recipe into `greengrass-build/recipes/`, stamping the
/// configured version unless it is the `NEXT_PATCH` sentinel. The project
/// author fills in a missing `ComponentPublisher`.
fn write_build_recipe(project: &ProjectConfig) -> Result<()> {
    let mut recipe = Recipe::read(&project.recipe_file)?;
    if let Some(author) = &project.author {
        if recipe.get("ComponentPublisher").is_none() {
            recipe.set("ComponentPublisher", Value::String(author.clone()));
        }
    }
    if project.component_version != NEXT_PATCH {
        recipe.set(
            "ComponentVersion",
            Value::String(project.component_version.clone()),
        );
    }
    recipe.write(&project.built_recipe_file())
}
