//! # ggdk CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each other `.rs`
//! file here is compiled as its own test crate and pulls this module in with
//! `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// `assert_cmd::Command` for the compiled `ggdk` binary.
pub fn ggdk_cmd() -> Command {
    Command::cargo_bin("ggdk").expect("Failed to find ggdk binary for testing")
}

/// Writes a zip-built component project (`gdk-config.json`, `recipe.json`,
/// `main.py`) into `dir`. `local` is the JSON of the persisted `local` section.
pub fn write_zip_project(dir: &Path, version: &str, local: &str) {
    fs::write(
        dir.join("gdk-config.json"),
        format!(
            r#"{{
                "component": {{
                    "com.example.HelloWorld": {{
                        "author": "ggdk",
                        "version": "{}",
                        "build": {{ "build_system": "zip" }},
                        "publish": {{ "bucket": "default", "region": "us-east-1" }},
                        "local": {}
                    }}
                }},
                "gdk_version": "1.0.0"
            }}"#,
            version, local
        ),
    )
    .expect("write gdk-config.json");
    fs::write(
        dir.join("recipe.json"),
        r#"{
            "RecipeFormatVersion": "2020-01-25",
            "ComponentName": "com.example.HelloWorld",
            "ComponentVersion": "1.0.0",
            "Manifests": [{
                "Platform": { "os": "linux" },
                "Lifecycle": { "Run": "python3 -u {artifacts:decompressedPath}/hello/main.py" },
                "Artifacts": [{ "URI": "s3://bucket/hello.zip", "Unarchive": "ZIP" }]
            }]
        }"#,
    )
    .expect("write recipe.json");
    fs::write(dir.join("main.py"), "print('hello')").expect("write main.py");
}
