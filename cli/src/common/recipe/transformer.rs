//! # Local Deploy Recipe Transformer
//!
//! File: cli/src/common/recipe/transformer.rs
//!
//! ## Overview
//!
//! Turns the recipe produced by the build into one the Greengrass core can
//! deploy from local files:
//! 1. `ComponentVersion` is set to the version being deployed.
//! 2. Cloud (`s3:`) artifact URIs are stripped, because the artifacts are
//!    delivered next to the recipe instead of being downloaded.
//! 3. `{artifacts:decompressedPath}` becomes `{artifacts:path}`, since local
//!    delivery never unpacks archives.
//! 4. The written file is checked for size and schema (`validator`).
//!
//! ## Artifact filtering
//!
//! Per manifest, the decision is made over the entries as they were read:
//! - If no entry lacks a `URI` or has a non-cloud `URI`, the component only has
//!   cloud artifacts and the whole `Artifacts` key is dropped.
//! - Otherwise cloud `URI` fields are removed, entries that held nothing but a
//!   cloud `URI` are removed, and every other entry is kept as is.
//!
use crate::common::fs::io;
use crate::common::recipe::{validator, Recipe};
use crate::core::error::Result;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

const CLOUD_URI_PREFIX: &str = "s3:";
const DECOMPRESSED_PATH_TOKEN: &str = "{artifacts:decompressedPath}";
const PATH_TOKEN: &str = "{artifacts:path}";

/// Transforms the recipe at `source` into `destination` for `version`.
pub fn transform(source: &Path, destination: &Path, version: &str) -> Result<()> {
    debug!("Read recipe file: {}", source.display());
    let recipe = Recipe::read(source)?;
    transform_recipe(recipe, destination, version)
}

/// Same as [`transform`] for an already parsed recipe.
pub fn transform_recipe(mut recipe: Recipe, destination: &Path, version: &str) -> Result<()> {
    recipe.set("ComponentVersion", Value::String(version.to_string()));
    if let Some(Value::Array(manifests)) = recipe.get("Manifests") {
        let manifests = strip_cloud_artifacts(manifests);
        recipe.set("Manifests", Value::Array(manifests));
    }

    info!("Creating component recipe at '{}'.", destination.display());
    recipe.write(destination)?;
    replace_decompressed_path(destination)?;
    validator::verify_recipe(destination)
}

/// Returns the manifests with cloud artifact references removed.
pub fn strip_cloud_artifacts(manifests: &[Value]) -> Vec<Value> {
    manifests
        .iter()
        .map(|manifest| match manifest {
            Value::Object(fields) => Value::Object(strip_manifest(fields)),
            other => other.clone(),
        })
        .collect()
}

fn strip_manifest(manifest: &Map<String, Value>) -> Map<String, Value> {
    let Some(Value::Array(artifacts)) = manifest.get("Artifacts") else {
        return manifest.clone();
    };

    let keep = artifacts.iter().any(|artifact| !is_cloud_artifact(artifact));
    let mut stripped = manifest.clone();
    if !keep {
        stripped.remove("Artifacts");
        return stripped;
    }

    let local_artifacts: Vec<Value> = artifacts
        .iter()
        .filter_map(|artifact| match artifact {
            Value::Object(entry) if is_cloud_artifact(artifact) => {
                let mut entry = entry.clone();
                entry.remove("URI");
                (!entry.is_empty()).then_some(Value::Object(entry))
            }
            other => Some(other.clone()),
        })
        .collect();
    stripped.insert("Artifacts".to_string(), Value::Array(local_artifacts));
    stripped
}

fn is_cloud_artifact(artifact: &Value) -> bool {
    matches!(
        artifact.get("URI"),
        Some(Value::String(uri)) if uri.starts_with(CLOUD_URI_PREFIX)
    )
}

fn replace_decompressed_path(path: &Path) -> Result<()> {
    let contents = io::read_file_to_string(path)?;
    io::write_string_to_file(path, &contents.replace(DECOMPRESSED_PATH_TOKEN, PATH_TOKEN))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GdkError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn recipe_with_artifacts(artifacts: Value) -> Value {
        json!({
            "RecipeFormatVersion": "2020-01-25",
            "ComponentName": "com.example.HelloWorld",
            "ComponentVersion": "1.0.0",
            "ComponentDescription": "My first Greengrass component.",
            "ComponentPublisher": "Amazon",
            "ComponentConfiguration": { "DefaultConfiguration": { "Message": "world" } },
            "Manifests": [
                {
                    "Platform": { "os": "linux" },
                    "Lifecycle": {
                        "Run": "python3 -u {artifacts:decompressedPath}/hello_world.py '{configuration:/Message}'"
                    },
                    "Artifacts": artifacts
                }
            ]
        })
    }

    #[test]
    fn test_cloud_only_manifest_loses_artifacts_key() -> Result<()> {
        let dir = tempdir()?;
        let source = dir.path().join("recipe.json");
        let destination = dir.path().join("out/com.example.HelloWorld-0.0.1.json");
        fs::write(
            &source,
            recipe_with_artifacts(json!([
                { "URI": "s3://DOC-EXAMPLE-BUCKET/artifacts/com.example.HelloWorld/1.0.0/hello_world.py" }
            ]))
            .to_string(),
        )?;

        transform(&source, &destination, "0.0.1")?;

        let text = fs::read_to_string(&destination)?;
        assert!(!text.contains("decompressedPath"));
        assert!(text.contains("{artifacts:path}/hello_world.py"));
        let recipe = Recipe::read(&destination)?;
        assert_eq!(recipe.get("ComponentVersion"), Some(&json!("0.0.1")));
        assert!(recipe.get("Manifests").unwrap()[0].get("Artifacts").is_none());
        Ok(())
    }

    #[test]
    fn test_mixed_artifacts_keep_local_entry() -> Result<()> {
        let dir = tempdir()?;
        let source = dir.path().join("recipe.yaml");
        let destination = dir.path().join("c-1.0.1.yaml");
        let recipe = Recipe::from_value(recipe_with_artifacts(json!([
            { "URI": "s3://bucket/hello.zip" },
            { "URI": "https://example.com/tool.bin", "Permission": { "Execute": "OWNER" } }
        ])))?;
        recipe.write(&source)?;

        transform(&source, &destination, "1.0.1")?;

        let written = Recipe::read(&destination)?;
        assert_eq!(
            written.get("Manifests").unwrap()[0]["Artifacts"],
            json!([
                { "URI": "https://example.com/tool.bin", "Permission": { "Execute": "OWNER" } }
            ])
        );
        Ok(())
    }

    #[test]
    fn test_cloud_uri_dropped_but_other_fields_kept() {
        let manifests = vec![json!({
            "Artifacts": [
                { "URI": "s3://bucket/hello.zip", "Unarchive": "ZIP" },
                { "Permission": { "Read": "ALL" } }
            ]
        })];
        assert_eq!(
            strip_cloud_artifacts(&manifests),
            vec![json!({
                "Artifacts": [
                    { "Unarchive": "ZIP" },
                    { "Permission": { "Read": "ALL" } }
                ]
            })]
        );
    }

    #[test]
    fn test_entry_without_uri_is_preserved() {
        let manifests = vec![json!({ "Artifacts": [ {}, { "URI": "s3://bucket/a" } ] })];
        assert_eq!(
            strip_cloud_artifacts(&manifests),
            vec![json!({ "Artifacts": [ {} ] })]
        );
    }

    #[test]
    fn test_single_cloud_entry_with_extra_fields_removes_artifacts() {
        // No entry marks the manifest as local, so the list goes even though
        // the cloud entry carried other fields.
        let manifests = vec![json!({
            "Name": "Linux",
            "Artifacts": [ { "URI": "s3://bucket/a", "Unarchive": "ZIP" } ]
        })];
        assert_eq!(
            strip_cloud_artifacts(&manifests),
            vec![json!({ "Name": "Linux" })]
        );
    }

    #[test]
    fn test_manifests_without_artifacts_are_untouched() {
        let manifests = vec![json!({ "Lifecycle": { "Run": "echo hi" } })];
        assert_eq!(strip_cloud_artifacts(&manifests), manifests);
    }

    #[test]
    fn test_oversized_result_fails_with_size() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("big.json");
        let mut document = recipe_with_artifacts(json!([]));
        document["ComponentDescription"] = json!("x".repeat(20000));

        let err = transform_recipe(Recipe::from_value(document).unwrap(), &destination, "1.0.0")
            .unwrap_err();
        let written = fs::metadata(&destination).unwrap().len();
        match err.downcast_ref::<GdkError>() {
            Some(GdkError::RecipeTooLarge { size }) => assert_eq!(*size, written),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(&format!("size of {} bytes", written)));
    }

    #[test]
    fn test_invalid_version_is_rejected_by_schema() {
        let dir = tempdir().unwrap();
        let destination = dir.path().join("bad.json");
        let err = transform_recipe(
            Recipe::from_value(recipe_with_artifacts(json!([]))).unwrap(),
            &destination,
            "not-a-version",
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GdkError>(),
            Some(GdkError::RecipeInvalid { .. })
        ));
    }
}
