//! # ggdk Component Local Deploy Handler
//!
//! File: cli/src/commands/component/local_deploy.rs
//!
//! ## Overview
//!
//! Implements `ggdk component local-deploy`: builds the component, stages its
//! artifacts and a locally deployable recipe under `greengrass-local-build/`,
//! copies them to the device when a host is configured, and asks the device's
//! `greengrass-cli` to merge the component into its local deployment.
//!
//! ## Architecture
//!
//! `LocalDeployCommand::run` walks these stages in order. Each one only starts
//! when the previous one succeeded:
//!
//! 1. **Resolve version**: `NEXT_PATCH` becomes the patch after the version
//!    the device reports in `component list`, or `0.0.1` if the device does
//!    not know the component. Any other version is used as configured.
//! 2. **Build**: delegated to the `ComponentBuilder`.
//! 3. **Stage directories**: the staging root is recreated with `recipes/`
//!    and `artifacts/<name>/<version>/`.
//! 4. **Copy artifacts** into the per-version directory.
//! 5. **Transform recipe** (`common::recipe::transformer`).
//! 6. **Ensure remote directory** (remote targets only).
//! 7. **Transport**: two recursive `scp` copies, `artifacts/` then `recipes/`
//!    (remote targets only).
//! 8. **Deploy**: `sudo <greengrass>/bin/greengrass-cli deployment create --merge ...`.
//!
//! A failure at any stage is logged with the component name and returned
//! unchanged. Nothing is rolled back; the staging directory and any copied
//! remote files stay for inspection.
//!
//! ## Usage
//!
//! ```bash
//! ggdk component local-deploy
//! ggdk component local-deploy --host 10.0.0.5 --user pi --port 2222 --component-dir /home/pi/components
//! ```
//!
use super::load_current_project;
use crate::common::build::{ComponentBuilder, ProjectBuilder};
use crate::common::fs::{copy, io};
use crate::common::process::{CommandRunner, SystemRunner, DEFAULT_TIMEOUT, TRANSPORT_TIMEOUT};
use crate::common::recipe::transformer;
use crate::common::remote::RemoteExecutor;
use crate::core::config::{BuildSystem, ProjectConfig, NEXT_PATCH};
use crate::core::error::Result;
use crate::core::local_config::{LocalDeployConfig, TargetOverrides};
use anyhow::anyhow;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Version used when the device has never seen the component.
const FIRST_VERSION: &str = "0.0.1";

#[derive(Parser, Debug)]
#[command(about = "Build and deploy the component to a Greengrass core device")]
pub struct LocalDeployArgs {
    #[command(flatten)]
    pub target: TargetOverrides,
}

pub async fn handle_local_deploy(args: LocalDeployArgs) -> Result<()> {
    info!("Handling component local-deploy command with args: {:?}", args);
    let project = load_current_project()?;
    let config = LocalDeployConfig::resolve(&args.target, &project)?;
    let command = LocalDeployCommand::new(
        project,
        config,
        Arc::new(SystemRunner),
        Box::new(ProjectBuilder),
    );
    let version = command.run().await?;
    println!(
        "Requested deployment of {}={}",
        command.config.component_name, version
    );
    Ok(())
}

/// One `local-deploy` invocation.
pub struct LocalDeployCommand {
    project: ProjectConfig,
    config: LocalDeployConfig,
    executor: RemoteExecutor,
    builder: Box<dyn ComponentBuilder>,
}

impl LocalDeployCommand {
    pub fn new(
        project: ProjectConfig,
        config: LocalDeployConfig,
        runner: Arc<dyn CommandRunner>,
        builder: Box<dyn ComponentBuilder>,
    ) -> Self {
        let executor = RemoteExecutor::new(config.target.clone(), runner);
        Self {
            project,
            config,
            executor,
            builder,
        }
    }

    /// Runs the whole pipeline and returns the deployed version.
    ///
    /// Stages run strictly in order and the first failure stops the run.
    /// Nothing is rolled back: the staging directory and any files already
    /// copied to the device are left in place.
    ///
    /// # Returns
    ///
    /// The component version that was requested from the device, which is the
    /// resolved patch when the project version is `NEXT_PATCH`.
    ///
    /// # Errors
    ///
    /// - `GdkError::Build` when the builder fails.
    /// - `GdkError::FileSystem` or an I/O error while staging.
    /// - `GdkError::RecipeTooLarge`, `GdkError::RecipeInvalid` or
    ///   `GdkError::SchemaInvalid` when the transformed recipe is rejected.
    /// - `GdkError::Transport` when `ssh`, `scp` or `greengrass-cli` fails or
    ///   times out.
    /// - A plain error when the device reports a version whose patch segment
    ///   cannot be incremented.
    ///
    /// Every error is logged with the component name before it is returned.
    pub async fn run(&self) -> Result<String> {
        info!("Deploy the component to Greengrass Core.");
        self.run_stages().await.map_err(|e| {
            error!(
                "Failed to request deploy component '{}'.",
                self.config.component_name
            );
            e
        })
    }

    async fn run_stages(&self) -> Result<String> {
        let version = self.resolve_version().await?;
        info!("Component version: {}", version);

        self.builder.build(&self.project).await?;

        info!(
            "Copy the component built artifacts to {}.",
            self.config.target.host.as_deref().unwrap_or("localhost")
        );
        self.create_staging_dirs(&version)?;
        self.copy_artifacts(&version)?;
        self.create_recipe(&version)?;

        if self.config.target.is_remote() {
            self.executor
                .ensure_remote_directory(&self.config.target.remote_dir)
                .await?;
            self.copy_to_remote().await?;
        }

        self.deploy(&version).await?;
        Ok(version)
    }

    /// `sudo <greengrass>/bin/greengrass-cli <args...>`
    fn management_cli(&self, args: &[&str]) -> Vec<String> {
        let mut argv = vec!["sudo".to_string(), self.config.target.greengrass_cli()];
        argv.extend(args.iter().map(|arg| arg.to_string()));
        argv
    }

    async fn resolve_version(&self) -> Result<String> {
        debug!("Get component version");
        if self.config.component_version != NEXT_PATCH {
            return Ok(self.config.component_version.clone());
        }
        let listing = self
            .executor
            .run_remote(&self.management_cli(&["component", "list"]), DEFAULT_TIMEOUT)
            .await?;
        version_after_listing(&listing, &self.config.component_name)
    }

    fn create_staging_dirs(&self, version: &str) -> Result<()> {
        io::clean_dir(&self.config.staging_root)?;
        debug!(
            "Creating '{}' directory with artifacts and recipes.",
            self.config.staging_root.display()
        );
        io::ensure_dir_exists(&self.config.staging_recipes_root)?;
        io::ensure_dir_exists(&self.config.versioned_artifacts_dir(version))
    }

    fn copy_artifacts(&self, version: &str) -> Result<()> {
        let version_dir = self.config.versioned_artifacts_dir(version);

        if self.project.build_system == BuildSystem::Zip {
            let project_dir_name = self.project.project_dir_name();
            let source = self
                .project
                .project_dir
                .join(self.project.build_system.build_folder().join("/"))
                .join(&project_dir_name);
            let folder = match self.project.zip_name_option() {
                Some(zip_name) if !zip_name.is_empty() => zip_name,
                Some(_) => self.project.component_name.clone(),
                None => project_dir_name,
            };
            let target = version_dir.join(folder);
            copy::copy_dir_contents(&source, &target)?;
            debug!("Copied artifacts to {}", target.display());
            return Ok(());
        }

        let source = &self.project.gg_build_component_artifacts_dir;
        if !source.is_dir() {
            info!("No build artifacts found in {}", source.display());
            return Ok(());
        }
        copy::copy_dir_contents(source, &version_dir)?;
        debug!("Copied artifacts to {}", version_dir.display());
        Ok(())
    }

    fn create_recipe(&self, version: &str) -> Result<()> {
        info!(
            "Updating the component recipe {}-{}.",
            self.config.component_name, version
        );
        transformer::transform(
            &self.project.built_recipe_file(),
            &self.config.versioned_recipe_file(version),
            version,
        )
    }

    async fn copy_to_remote(&self) -> Result<()> {
        let user_host = self
            .config
            .target
            .ssh_destination()
            .ok_or_else(|| anyhow!("Remote copy requested without a host and user"))?;
        let destination = format!(
            "{}:{}/",
            user_host,
            self.config.target.remote_dir.trim_end_matches('/')
        );

        for source in [
            &self.config.staging_artifacts_root,
            &self.config.staging_recipes_root,
        ] {
            self.executor
                .copy(&source.to_string_lossy(), &destination, TRANSPORT_TIMEOUT)
                .await?;
        }
        info!("Copy component successful");
        Ok(())
    }

    async fn deploy(&self, version: &str) -> Result<()> {
        info!("deploy component");
        let delivery_dir = self.config.delivery_dir();
        let merge = format!("{}={}", self.config.component_name, version);
        let recipe_dir = format!("{}/recipes", delivery_dir);
        let mut argv = self.management_cli(&[
            "deployment",
            "create",
            "--merge",
            &merge,
            "--recipeDir",
            &recipe_dir,
        ]);

        if io::dir_has_entries(&self.config.versioned_artifacts_dir(version))? {
            argv.push("--artifactDir".to_string());
            argv.push(format!("{}/artifacts", delivery_dir));
        } else {
            info!("No artifacts found in local build dir");
        }

        self.executor.run_remote(&argv, DEFAULT_TIMEOUT).await?;
        info!("Deploy component request successful");
        Ok(())
    }
}

/// Picks the version to deploy from a `greengrass-cli component list` output:
/// the patch after the first `Version:` line that follows the line naming the
/// component, or `0.0.1` when the component is not listed.
pub fn version_after_listing(listing: &str, component_name: &str) -> Result<String> {
    let mut lines = listing.lines();
    if !lines.any(|line| line.contains(component_name)) {
        return Ok(FIRST_VERSION.to_string());
    }
    match lines.find_map(|line| line.trim().strip_prefix("Version:")) {
        Some(current) => next_patch(current.trim()),
        None => {
            warn!(
                "Component '{}' is listed without a version, deploying {}",
                component_name, FIRST_VERSION
            );
            Ok(FIRST_VERSION.to_string())
        }
    }
}

/// `a.b.c` becomes `a.b.(c+1)`.
pub fn next_patch(version: &str) -> Result<String> {
    let (head, patch) = match version.rsplit_once('.') {
        Some((head, patch)) => (Some(head), patch),
        None => (None, version),
    };
    let next = patch
        .parse::<u64>()
        .ok()
        .and_then(|patch| patch.checked_add(1))
        .ok_or_else(|| anyhow!("Cannot compute the next patch of version '{}'", version))?;
    Ok(match head {
        Some(head) => format!("{}.{}", head, next),
        None => next.to_string(),
    })
}
