//! # ggdk Component Recipes (`common::recipe`)
//!
//! File: cli/src/common/recipe/mod.rs
//!
//! ## Overview
//!
//! A component recipe is a JSON or YAML document describing the component,
//! its manifests, lifecycle and artifacts. This module reads and writes
//! recipes as an ordered `serde_json::Value` tree, in the format implied by
//! the file extension.
//!
//! Recipe keys are case-insensitive. On read, every key whose lowercase form
//! matches a known recipe key is rewritten to its canonical spelling
//! (`componentversion` becomes `ComponentVersion`), so the rest of the code
//! and the schema can use exact lookups. Unknown keys, such as user
//! configuration values, are left untouched.
//!
//! ## Submodules
//!
//! - **`transformer`**: rewrites a built recipe for local delivery.
//! - **`validator`**: size and schema validation of a written recipe.
//!
use crate::core::error::{GdkError, Result};
use anyhow::{anyhow, Context};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

pub mod transformer;
pub mod validator;

/// Canonical spelling of the keys the recipe format defines.
const CANONICAL_KEYS: &[&str] = &[
    "RecipeFormatVersion",
    "ComponentName",
    "ComponentVersion",
    "ComponentType",
    "ComponentDescription",
    "ComponentPublisher",
    "ComponentSource",
    "ComponentConfiguration",
    "DefaultConfiguration",
    "ComponentDependencies",
    "VersionRequirement",
    "DependencyType",
    "Manifests",
    "Name",
    "Platform",
    "Lifecycle",
    "Selections",
    "Artifacts",
    "URI",
    "Digest",
    "Algorithm",
    "Unarchive",
    "Permission",
    "Read",
    "Execute",
];

/// Keys whose values are user data and are never canonicalized.
const OPAQUE_KEYS: &[&str] = &["DefaultConfiguration", "Lifecycle", "Platform"];

/// Serialization format of a recipe file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormat {
    Json,
    Yaml,
}

impl RecipeFormat {
    /// Format from the file extension; anything other than `yaml`/`yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// A parsed recipe document.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    document: Map<String, Value>,
}

impl Recipe {
    /// Wraps an existing document, canonicalizing its keys.
    pub fn from_value(value: Value) -> Result<Self> {
        match canonicalize(value) {
            Value::Object(document) => Ok(Self { document }),
            _ => Err(anyhow!(GdkError::FileSystem(
                "A recipe must be a mapping at the top level.".into()
            ))),
        }
    }

    /// Reads and parses a recipe file.
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Reading recipe file {:?}", path);
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))?;
        Self::parse(&content, RecipeFormat::from_path(path))
            .with_context(|| format!("Failed to parse recipe {:?}", path))
    }

    pub fn parse(content: &str, format: RecipeFormat) -> Result<Self> {
        let value: Value = match format {
            RecipeFormat::Json => serde_json::from_str(content)?,
            RecipeFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Self::from_value(value)
    }

    /// Serializes the recipe in the format of `path` and writes it, creating
    /// the parent directory if needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.to_string_as(RecipeFormat::from_path(path))?;
        crate::common::fs::io::write_string_to_file(path, &content)
    }

    pub fn to_string_as(&self, format: RecipeFormat) -> Result<String> {
        Ok(match format {
            RecipeFormat::Json => serde_json::to_string_pretty(&self.document)?,
            RecipeFormat::Yaml => serde_yaml::to_string(&self.document)?,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Sets a top-level key, keeping its position when it already exists.
    pub fn set(&mut self, key: &str, value: Value) {
        self.document.insert(key.to_string(), value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    CANONICAL_KEYS
        .iter()
        .copied()
        .find(|canonical| canonical.eq_ignore_ascii_case(key))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = canonical_key(&key).map_or(key, str::to_string);
                    if OPAQUE_KEYS.contains(&key.as_str()) {
                        (key, value)
                    } else {
                        (key, canonicalize(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_keys_are_canonicalized_case_insensitively() -> Result<()> {
        let recipe = Recipe::parse(
            r#"{
                "recipeformatversion": "2020-01-25",
                "componentVersion": "1.0.0",
                "MANIFESTS": [ { "artifacts": [ { "uri": "s3://bucket/a.zip" } ] } ],
                "ComponentConfiguration": { "DefaultConfiguration": { "message": "hi" } }
            }"#,
            RecipeFormat::Json,
        )?;
        assert_eq!(recipe.get("ComponentVersion"), Some(&json!("1.0.0")));
        assert_eq!(
            recipe.get("Manifests"),
            Some(&json!([{ "Artifacts": [{ "URI": "s3://bucket/a.zip" }] }]))
        );
        // Unknown keys keep their spelling.
        assert_eq!(
            recipe.get("ComponentConfiguration"),
            Some(&json!({ "DefaultConfiguration": { "message": "hi" } }))
        );
        Ok(())
    }

    #[test]
    fn test_user_configuration_is_left_alone() -> Result<()> {
        let recipe = Recipe::parse(
            r#"{ "ComponentConfiguration": { "DefaultConfiguration": { "name": "x", "uri": "y" } } }"#,
            RecipeFormat::Json,
        )?;
        assert_eq!(
            recipe.get("ComponentConfiguration"),
            Some(&json!({ "DefaultConfiguration": { "name": "x", "uri": "y" } }))
        );
        Ok(())
    }

    #[test]
    fn test_set_keeps_key_order() -> Result<()> {
        let mut recipe = Recipe::parse(
            "ComponentName: a\nComponentVersion: 1.0.0\nManifests: []\n",
            RecipeFormat::Yaml,
        )?;
        recipe.set("ComponentVersion", json!("2.0.0"));
        let document = recipe.into_value();
        let keys: Vec<&String> = document.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["ComponentName", "ComponentVersion", "Manifests"]);
        Ok(())
    }

    #[test]
    fn test_write_follows_extension() -> Result<()> {
        let dir = tempdir()?;
        let recipe = Recipe::from_value(json!({ "ComponentName": "a" }))?;

        let yaml_path = dir.path().join("out/recipe.yaml");
        recipe.write(&yaml_path)?;
        assert_eq!(fs::read_to_string(&yaml_path)?, "ComponentName: a\n");

        let json_path = dir.path().join("recipe.json");
        recipe.write(&json_path)?;
        assert_eq!(Recipe::read(&json_path)?, recipe);
        Ok(())
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        assert!(Recipe::parse("[1, 2]", RecipeFormat::Json).is_err());
    }
}
