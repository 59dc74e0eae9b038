//! # ggdk Local Deployment Configuration
//!
//! File: cli/src/core/local_config.rs
//!
//! ## Overview
//!
//! Resolves the effective target for `local-deploy`, `local-list` and
//! `local-remove`. Each field is taken from, in order of precedence:
//! 1. The command-line flag
//! 2. The component's persisted `local` section in `gdk-config.json`
//! 3. A hard-coded default
//!
//! Empty strings at any layer count as "not set" and fall through.
//!
//! The resolved `LocalDeployConfig` also carries the local staging layout
//! (`greengrass-local-build/artifacts/<name>/<version>`,
//! `greengrass-local-build/recipes/<name>-<version>.<ext>`). The paths are pure
//! functions of the component name, the configured version and the project
//! directory; no I/O happens while resolving.
//!
use crate::core::config::{ProjectConfig, LOCAL_BUILD_DIR_NAME};
use crate::core::error::{GdkError, Result};
use anyhow::bail;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_PORT: &str = "22";
pub const DEFAULT_COMPONENT_DIR: &str = "~/greengrass-components";
pub const DEFAULT_GREENGRASS_DIR: &str = "/greengrass/v2";

/// Target flags shared by the local commands. Unset flags fall through to the
/// persisted `local` section, then to the defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetOverrides {
    /// SSH host of the Greengrass core device. Omit to run on this machine.
    #[arg(long)]
    pub host: Option<String>,
    /// SSH port (default 22).
    #[arg(long)]
    pub port: Option<String>,
    /// SSH user; required whenever a host is set.
    #[arg(long)]
    pub user: Option<String>,
    /// Private key passed to ssh/scp with `-i`.
    #[arg(long)]
    pub key_file: Option<String>,
    /// Directory on the device that receives artifacts and recipes (default ~/greengrass-components).
    #[arg(long)]
    pub component_dir: Option<String>,
    /// Greengrass installation root on the device (default /greengrass/v2).
    #[arg(long)]
    pub greengrass_dir: Option<String>,
}

/// Where commands run. Plain value holder, immutable after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: String,
    pub key_file: Option<PathBuf>,
    /// Component directory on the device.
    pub remote_dir: String,
    pub greengrass_install_dir: String,
}

impl DeployTarget {
    /// A target that runs everything on this machine.
    pub fn local() -> Self {
        Self {
            host: None,
            user: None,
            port: DEFAULT_PORT.to_string(),
            key_file: None,
            remote_dir: DEFAULT_COMPONENT_DIR.to_string(),
            greengrass_install_dir: DEFAULT_GREENGRASS_DIR.to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.host.is_some()
    }

    /// `<user>@<host>`, when remote.
    pub fn ssh_destination(&self) -> Option<String> {
        match (&self.user, &self.host) {
            (Some(user), Some(host)) => Some(format!("{}@{}", user, host)),
            _ => None,
        }
    }

    /// Absolute path of `greengrass-cli` on the device.
    pub fn greengrass_cli(&self) -> String {
        format!(
            "{}/bin/greengrass-cli",
            self.greengrass_install_dir.trim_end_matches('/')
        )
    }
}

/// Effective configuration for one local command invocation.
#[derive(Debug, Clone)]
pub struct LocalDeployConfig {
    pub component_name: String,
    /// Configured version; may be the `NEXT_PATCH` sentinel.
    pub component_version: String,
    pub target: DeployTarget,
    pub staging_root: PathBuf,
    pub staging_artifacts_root: PathBuf,
    pub staging_recipes_root: PathBuf,
    /// `<staging>/artifacts/<name>/<configured version>`.
    pub staging_component_artifacts_dir: PathBuf,
    recipe_extension: String,
    /// Whether `component_dir` came from a flag or `gdk-config.json` rather than the default.
    component_dir_configured: bool,
}

/// First non-empty of the CLI value and the persisted value, else the default.
fn resolve_field(cli: Option<&str>, persisted: Option<&str>, default: &str) -> String {
    [cli, persisted]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl LocalDeployConfig {
    /// Merges the CLI overrides over the project's persisted `local` settings.
    ///
    /// # Errors
    ///
    /// Returns `GdkError::Config` when exactly one of host and user is set.
    pub fn resolve(overrides: &TargetOverrides, project: &ProjectConfig) -> Result<Self> {
        let local = &project.local;
        let host = resolve_field(overrides.host.as_deref(), local.host.as_deref(), "");
        let user = resolve_field(overrides.user.as_deref(), local.user.as_deref(), "");
        if !host.is_empty() && user.is_empty() {
            bail!(GdkError::Config(
                "SSH user configuration is required for remote command.".into()
            ));
        }
        if !user.is_empty() && host.is_empty() {
            bail!(GdkError::Config(
                "SSH host configuration is required for remote command.".into()
            ));
        }

        let defaults = DeployTarget::local();
        let component_dir_configured = [
            overrides.component_dir.as_deref(),
            local.component_dir.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|value| !value.is_empty());
        let port = resolve_field(overrides.port.as_deref(), local.port.as_deref(), &defaults.port);
        let key_file = resolve_field(
            overrides.key_file.as_deref(),
            local.key_file.as_deref(),
            "",
        );
        let remote_dir = resolve_field(
            overrides.component_dir.as_deref(),
            local.component_dir.as_deref(),
            &defaults.remote_dir,
        );
        let greengrass_install_dir = resolve_field(
            overrides.greengrass_dir.as_deref(),
            local.greengrass_dir.as_deref(),
            &defaults.greengrass_install_dir,
        );

        let target = DeployTarget {
            host: non_empty(host),
            user: non_empty(user),
            port,
            // The key lives on this machine, so `~` is expanded here; remote paths are left alone.
            key_file: non_empty(key_file)
                .map(|path| PathBuf::from(shellexpand::tilde(&path).into_owned())),
            remote_dir,
            greengrass_install_dir,
        };

        let staging_root = project.project_dir.join(LOCAL_BUILD_DIR_NAME);
        let staging_artifacts_root = staging_root.join("artifacts");
        let staging_recipes_root = staging_root.join("recipes");
        let staging_component_artifacts_dir = staging_artifacts_root
            .join(&project.component_name)
            .join(&project.component_version);
        let recipe_extension = project.recipe_extension();

        let config = Self {
            component_name: project.component_name.clone(),
            component_version: project.component_version.clone(),
            target,
            staging_root,
            staging_artifacts_root,
            staging_recipes_root,
            staging_component_artifacts_dir,
            recipe_extension,
            component_dir_configured,
        };
        debug!("Resolved local deploy configuration: {:?}", config);
        Ok(config)
    }

    /// Staged artifact directory for `version`. The precomputed directory is
    /// named after the configured version, which may be the `NEXT_PATCH`
    /// sentinel; in that case the resolved version takes its place.
    pub fn versioned_artifacts_dir(&self, version: &str) -> PathBuf {
        if self.staging_component_artifacts_dir.ends_with(version) {
            return self.staging_component_artifacts_dir.clone();
        }
        self.staging_artifacts_root
            .join(&self.component_name)
            .join(version)
    }

    /// Staged recipe path for `version`.
    pub fn versioned_recipe_file(&self, version: &str) -> PathBuf {
        self.staging_recipes_root.join(format!(
            "{}-{}.{}",
            self.component_name, version, self.recipe_extension
        ))
    }

    /// Directory the management CLI reads recipes and artifacts from. This is
    /// the component directory on a remote target, and on a local target
    /// whose component directory was configured explicitly. A local target
    /// left on the default reads straight from the staging root, since
    /// nothing is copied.
    pub fn delivery_dir(&self) -> String {
        if self.target.is_remote() || self.component_dir_configured {
            self.target.remote_dir.trim_end_matches('/').to_string()
        } else {
            self.staging_root.to_string_lossy().into_owned()
        }
    }
}
