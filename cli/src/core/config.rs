//! # ggdk Project Configuration
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the component project configuration (`gdk-config.json`)
//! and discovers the component recipe that sits next to it. The result is a
//! `ProjectConfig` describing the single component defined by the project,
//! its build system and options, the persisted `local` deployment settings,
//! and the build output directories the builder populates.
//!
//! ## Architecture
//!
//! - The project directory is passed in explicitly; nothing here reads the
//!   process working directory.
//! - `gdk-config.json` is deserialized with `serde_json` into raw structs,
//!   then validated and flattened into `ProjectConfig`.
//! - Exactly one component must be defined.
//! - The recipe is `recipe.json`, `recipe.yaml` or `recipe.yml` in the project
//!   root, matched case-insensitively.
//!
//! ## Examples
//!
//! ```rust
//! let project = config::ProjectConfig::load(&project_dir)?;
//! println!("{} uses {}", project.component_name, project.build_system);
//! ```
//!
use crate::core::error::{GdkError, Result};
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the project configuration file in the project root.
pub const PROJECT_CONFIG_FILENAME: &str = "gdk-config.json";
/// Directory (relative to the project root) the builder writes artifacts and recipes to.
pub const BUILD_DIR_NAME: &str = "greengrass-build";
/// Directory (relative to the project root) holding the per-run local deploy staging tree.
pub const LOCAL_BUILD_DIR_NAME: &str = "greengrass-local-build";
/// Version sentinel meaning "derive the next patch version from the device".
pub const NEXT_PATCH: &str = "NEXT_PATCH";

const RECIPE_FILE_NAMES: [&str; 3] = ["recipe.json", "recipe.yaml", "recipe.yml"];

// --- Raw file model ---

#[derive(Deserialize, Debug)]
struct RawProjectFile {
    component: BTreeMap<String, RawComponent>,
}

#[derive(Deserialize, Debug)]
struct RawComponent {
    #[serde(default)]
    author: Option<String>,
    #[serde(default = "default_version")]
    version: String,
    build: RawBuild,
    // Cloud publishing settings are carried by the file but unused by local commands.
    #[serde(default)]
    #[allow(dead_code)]
    publish: Option<serde_json::Value>,
    #[serde(default)]
    local: LocalSettings,
}

#[derive(Deserialize, Debug)]
struct RawBuild {
    build_system: String,
    #[serde(default)]
    custom_build_command: Option<Vec<String>>,
    #[serde(default)]
    options: serde_json::Map<String, serde_json::Value>,
}

fn default_version() -> String {
    NEXT_PATCH.to_string()
}

/// The persisted per-component `local` section. Empty strings count as unset.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocalSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub key_file: Option<String>,
    #[serde(default)]
    pub component_dir: Option<String>,
    #[serde(default)]
    pub greengrass_dir: Option<String>,
}

/// Build systems understood by `ggdk component build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSystem {
    Zip,
    Maven,
    Gradle,
    GradleWrapper,
    Custom,
}

impl BuildSystem {
    pub fn parse(identifier: &str) -> Result<Self> {
        match identifier.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "maven" => Ok(Self::Maven),
            "gradle" => Ok(Self::Gradle),
            "gradlew" => Ok(Self::GradleWrapper),
            "custom" => Ok(Self::Custom),
            other => Err(anyhow!(GdkError::ProjectConfig(format!(
                "Unsupported build system '{}'. Expected one of: zip, maven, gradle, gradlew, custom.",
                other
            )))),
        }
    }

    /// Folder (relative to the project root) where this build system leaves its output.
    pub fn build_folder(&self) -> &'static [&'static str] {
        match self {
            Self::Zip => &["zip-build"],
            Self::Maven => &["target"],
            Self::Gradle | Self::GradleWrapper => &["build", "libs"],
            Self::Custom => &[],
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zip => "zip",
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::GradleWrapper => "gradlew",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Resolved project configuration for the single component in the project.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub project_dir: PathBuf,
    pub component_name: String,
    pub author: Option<String>,
    /// Configured version; may be the `NEXT_PATCH` sentinel.
    pub component_version: String,
    pub build_system: BuildSystem,
    pub build_options: serde_json::Map<String, serde_json::Value>,
    pub custom_build_command: Option<Vec<String>>,
    pub local: LocalSettings,
    pub recipe_file: PathBuf,
    pub gg_build_dir: PathBuf,
    pub gg_build_artifacts_dir: PathBuf,
    pub gg_build_recipes_dir: PathBuf,
    /// `greengrass-build/artifacts/<name>/<configured version>`.
    pub gg_build_component_artifacts_dir: PathBuf,
}

impl ProjectConfig {
    /// Loads `gdk-config.json` and discovers the recipe in `project_dir`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(PROJECT_CONFIG_FILENAME);
        info!("Loading project configuration from: {}", config_path.display());
        let content = fs::read_to_string(&config_path).with_context(|| {
            GdkError::ProjectConfig(format!(
                "Could not read '{}'. Run ggdk from a component project directory.",
                config_path.display()
            ))
        })?;
        let raw: RawProjectFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from file: {}", config_path.display()))?;
        let recipe_file = find_recipe_file(project_dir)?;
        Self::from_raw(project_dir, raw, recipe_file)
    }

    fn from_raw(project_dir: &Path, raw: RawProjectFile, recipe_file: PathBuf) -> Result<Self> {
        if raw.component.len() != 1 {
            bail!(GdkError::ProjectConfig(format!(
                "Exactly one component must be defined in {}, found {}.",
                PROJECT_CONFIG_FILENAME,
                raw.component.len()
            )));
        }
        let (component_name, component) = raw
            .component
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!(GdkError::ProjectConfig("No component defined.".into())))?;

        let build_system = BuildSystem::parse(&component.build.build_system)?;
        if build_system == BuildSystem::Custom
            && component
                .build
                .custom_build_command
                .as_ref()
                .map_or(true, |cmd| cmd.is_empty())
        {
            bail!(GdkError::ProjectConfig(
                "The 'custom' build system requires a non-empty 'custom_build_command'.".into()
            ));
        }

        let gg_build_dir = project_dir.join(BUILD_DIR_NAME);
        let gg_build_artifacts_dir = gg_build_dir.join("artifacts");
        let gg_build_recipes_dir = gg_build_dir.join("recipes");
        let gg_build_component_artifacts_dir = gg_build_artifacts_dir
            .join(&component_name)
            .join(&component.version);

        let config = Self {
            project_dir: project_dir.to_path_buf(),
            component_name,
            author: component.author,
            component_version: component.version,
            build_system,
            build_options: component.build.options,
            custom_build_command: component.build.custom_build_command,
            local: component.local,
            recipe_file,
            gg_build_dir,
            gg_build_artifacts_dir,
            gg_build_recipes_dir,
            gg_build_component_artifacts_dir,
        };
        debug!("Final project configuration: {:?}", config);
        Ok(config)
    }

    /// File name of the recipe, e.g. `recipe.yaml`.
    pub fn recipe_file_name(&self) -> String {
        self.recipe_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension of the recipe file (`json`, `yaml` or `yml`).
    pub fn recipe_extension(&self) -> String {
        self.recipe_file
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "json".to_string())
    }

    /// Path of the recipe as written by the builder.
    pub fn built_recipe_file(&self) -> PathBuf {
        self.gg_build_recipes_dir.join(self.recipe_file_name())
    }

    /// Name of the project directory; the zip build stages its sources under it.
    pub fn project_dir_name(&self) -> String {
        self.project_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.component_name.clone())
    }

    /// The `zip_name` build option: `None` when absent or null, `Some("")` when present but empty.
    pub fn zip_name_option(&self) -> Option<String> {
        self.build_options
            .get("zip_name")
            .filter(|value| !value.is_null())
            .map(|value| value.as_str().unwrap_or_default().to_string())
    }
}

fn find_recipe_file(project_dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(project_dir)
        .with_context(|| format!("Failed to read project directory {:?}", project_dir))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if entry.path().is_file() && RECIPE_FILE_NAMES.contains(&name.as_str()) {
            found.push(entry.path());
        }
    }
    match found.len() {
        0 => bail!(GdkError::ProjectConfig(format!(
            "Could not find a component recipe (recipe.json or recipe.yaml) in {}.",
            project_dir.display()
        ))),
        1 => Ok(found.remove(0)),
        _ => bail!(GdkError::ProjectConfig(format!(
            "Found more than one component recipe in {}: {:?}",
            project_dir.display(),
            found
        ))),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_project(dir: &Path, config: &str) {
        fs::write(dir.join(PROJECT_CONFIG_FILENAME), config).unwrap();
        fs::write(dir.join("recipe.json"), "{}").unwrap();
    }

    #[test]
    fn test_load_project_with_local_section() -> Result<()> {
        let dir = tempdir()?;
        write_project(
            dir.path(),
            r#"{
                "component": {
                    "com.example.HelloWorld": {
                        "author": "author",
                        "version": "1.0.1",
                        "build": { "build_system": "zip", "options": { "zip_name": "" } },
                        "publish": { "bucket": "default", "region": "us-east-1" },
                        "local": {
                            "host": "some.host.name",
                            "port": "1234",
                            "user": "my-user",
                            "key_file": "/path/to/key.pem",
                            "component_dir": "/path/to/component",
                            "greengrass_dir": "/path/to/greengrass"
                        }
                    }
                },
                "gdk_version": "1.0.0"
            }"#,
        );

        let project = ProjectConfig::load(dir.path())?;
        assert_eq!(project.component_name, "com.example.HelloWorld");
        assert_eq!(project.component_version, "1.0.1");
        assert_eq!(project.build_system, BuildSystem::Zip);
        assert_eq!(project.local.host.as_deref(), Some("some.host.name"));
        assert_eq!(project.local.port.as_deref(), Some("1234"));
        assert_eq!(project.zip_name_option(), Some(String::new()));
        assert_eq!(project.recipe_extension(), "json");
        assert_eq!(
            project.gg_build_component_artifacts_dir,
            dir.path()
                .join("greengrass-build/artifacts/com.example.HelloWorld/1.0.1")
        );
        Ok(())
    }

    #[test]
    fn test_version_defaults_to_next_patch() -> Result<()> {
        let dir = tempdir()?;
        write_project(
            dir.path(),
            r#"{ "component": { "c": { "build": { "build_system": "maven" } } } }"#,
        );
        let project = ProjectConfig::load(dir.path())?;
        assert_eq!(project.component_version, NEXT_PATCH);
        assert_eq!(project.local, LocalSettings::default());
        assert_eq!(project.zip_name_option(), None);
        Ok(())
    }

    #[test]
    fn test_null_zip_name_counts_as_absent() -> Result<()> {
        let dir = tempdir()?;
        write_project(
            dir.path(),
            r#"{ "component": { "c": { "build": {
                "build_system": "zip",
                "options": { "zip_name": null }
            } } } }"#,
        );
        let project = ProjectConfig::load(dir.path())?;
        assert_eq!(project.zip_name_option(), None);
        Ok(())
    }

    #[test]
    fn test_more_than_one_component_is_rejected() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            r#"{ "component": {
                "a": { "build": { "build_system": "zip" } },
                "b": { "build": { "build_system": "zip" } }
            } }"#,
        );
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Exactly one component"));
    }

    #[test]
    fn test_unknown_build_system_is_rejected() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            r#"{ "component": { "a": { "build": { "build_system": "bazel" } } } }"#,
        );
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported build system 'bazel'"));
    }

    #[test]
    fn test_custom_build_requires_command() {
        let dir = tempdir().unwrap();
        write_project(
            dir.path(),
            r#"{ "component": { "a": { "build": { "build_system": "custom" } } } }"#,
        );
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("custom_build_command"));
    }

    #[test]
    fn test_missing_recipe_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            r#"{ "component": { "a": { "build": { "build_system": "zip" } } } }"#,
        )
        .unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Could not find a component recipe"));
    }

    #[test]
    fn test_recipe_discovery_is_case_insensitive() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            r#"{ "component": { "a": { "build": { "build_system": "zip" } } } }"#,
        )?;
        fs::write(dir.path().join("Recipe.YAML"), "ComponentName: a\n")?;
        let project = ProjectConfig::load(dir.path())?;
        assert_eq!(project.recipe_file_name(), "Recipe.YAML");
        assert_eq!(project.recipe_extension(), "YAML");
        Ok(())
    }
}
