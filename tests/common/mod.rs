// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides shared parameter fixtures, providers, and temp file setup

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use substitutor::functions::provider::arg_str;
use substitutor::functions::FunctionRegistry;
use substitutor::template::{ArgType, Params};
use substitutor::Substitutor;

/// Parameters used across the substitution tests
pub fn sample_params() -> Params {
    Params::new()
        .with("string", "Lorem ipsum dolor sit amet")
        .with("int", 2)
        .with("double", 3.14159)
        .with("stringWithSpace", "   World     ")
}

/// A provider that wraps values in markers
pub fn marker_provider() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new("markers");
    registry
        .register_unary("mark", |v| format!("<{}>", v))
        .register("between", &[ArgType::String, ArgType::String], |v, args| {
            Ok(format!("{}{}{}", arg_str(args, 0)?, v, arg_str(args, 1)?))
        });
    registry
}

pub fn marker_substitutor() -> Substitutor {
    Substitutor::with_provider(Arc::new(marker_provider()))
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }
}
