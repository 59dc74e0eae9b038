//! # Recipe Validation
//!
//! File: cli/src/common/recipe/validator.rs
//!
//! Checks a written recipe before it is handed to the device: first its size
//! on disk against the platform limit, then its structure against the recipe
//! schema embedded in the binary (`cli/static/recipe-schema.json`).
//!
use crate::common::recipe::Recipe;
use crate::core::error::{GdkError, Result};
use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Largest recipe the Greengrass core accepts, in bytes.
pub const MAX_RECIPE_SIZE: u64 = 16000;

const RECIPE_SCHEMA: &str = include_str!("../../../static/recipe-schema.json");

/// Validates the recipe file at `path` for size, then schema.
pub fn verify_recipe(path: &Path) -> Result<()> {
    info!("Validating the file size of the built recipe {}", path.display());
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {:?}", path))?
        .len();
    if size > MAX_RECIPE_SIZE {
        let err = GdkError::RecipeTooLarge { size };
        error!("{}", err);
        bail!(err);
    }

    info!("Validating the built recipe against the Greengrass recipe schema.");
    let recipe = Recipe::read(path)?;
    let schema: Value = serde_json::from_str(RECIPE_SCHEMA)
        .map_err(|e| anyhow!(GdkError::SchemaInvalid(e.to_string())))?;
    validate_against(&schema, &recipe.into_value(), path)
}

/// Validates `document` against `schema`. `path` only labels the error.
pub fn validate_against(schema: &Value, document: &Value, path: &Path) -> Result<()> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| anyhow!(GdkError::SchemaInvalid(e.to_string())))?;
    if let Some(violation) = validator.iter_errors(document).next() {
        bail!(GdkError::RecipeInvalid {
            path: path.to_path_buf(),
            message: violation.to_string(),
        });
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn valid_recipe() -> Value {
        json!({
            "RecipeFormatVersion": "2020-01-25",
            "ComponentName": "com.example.HelloWorld",
            "ComponentVersion": "1.0.0",
            "Manifests": [
                { "Platform": { "os": "linux" }, "Lifecycle": { "Run": "echo hi" } }
            ]
        })
    }

    #[test]
    fn test_embedded_schema_parses() {
        let schema: Value = serde_json::from_str(RECIPE_SCHEMA).unwrap();
        assert!(jsonschema::validator_for(&schema).is_ok());
    }

    #[test]
    fn test_valid_recipe_passes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("recipe.json");
        fs::write(&path, valid_recipe().to_string())?;
        verify_recipe(&path)
    }

    #[test]
    fn test_structural_violation_is_recipe_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        let mut recipe = valid_recipe();
        recipe["ComponentVersion"] = json!("NEXT_PATCH");
        fs::write(&path, recipe.to_string()).unwrap();

        let err = verify_recipe(&path).unwrap_err();
        match err.downcast_ref::<GdkError>() {
            Some(GdkError::RecipeInvalid { path: reported, .. }) => assert_eq!(reported, &path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_schema_is_schema_invalid() {
        let schema = json!({ "type": 12 });
        let err = validate_against(&schema, &valid_recipe(), Path::new("recipe.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GdkError>(),
            Some(GdkError::SchemaInvalid(_))
        ));
    }

    #[test]
    fn test_oversized_recipe_reports_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        let mut recipe = valid_recipe();
        recipe["ComponentDescription"] = json!("x".repeat(17000));
        let content = recipe.to_string();
        fs::write(&path, &content).unwrap();

        let err = verify_recipe(&path).unwrap_err();
        match err.downcast_ref::<GdkError>() {
            Some(GdkError::RecipeTooLarge { size }) => assert_eq!(*size, content.len() as u64),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
