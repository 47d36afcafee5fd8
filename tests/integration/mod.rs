//! Integration tests module for REST Workbench
//!
//! Shared fixture helpers: every test builds its own project tree in a
//! temporary directory.

pub mod discovery_test;
pub mod environment_test;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        rest_workbench::config::reset_config();
    });
}

/// A throwaway project tree.
pub struct Fixture {
    temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Writes `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }
}
