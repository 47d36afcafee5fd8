//! Configuration schema for REST Workbench.
//!
//! This module defines the configuration structure and validation logic for the
//! discovery and environment settings users can change.

use serde::{Deserialize, Serialize};

/// Main configuration structure for REST Workbench.
///
/// All settings can be configured via editor settings under the
/// "rest-workbench" key. Missing or invalid settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchConfig {
    /// Directory names pruned during discovery in addition to the built-in
    /// ignore set (`node_modules`, `target`, `vendor`, ...).
    #[serde(default)]
    pub extra_ignored_dirs: Vec<String>,

    /// How many lines below an endpoint the cursor may sit and still resolve
    /// to it. Defaults to 10.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_cursor_proximity")]
    pub cursor_proximity: usize,

    /// Source files larger than this many bytes are skipped. Defaults to 1 MiB.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Whether to run the file-based routing pass (`app/api`, `pages/api`).
    #[serde(default = "default_true")]
    pub file_routing: bool,

    /// Whether `.env*` files in the workspace root become environments.
    #[serde(default = "default_true")]
    pub sync_env_files: bool,

    /// Location of the saved environments file, relative to the workspace root.
    #[serde(default = "default_environment_file")]
    pub environment_file: String,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            extra_ignored_dirs: Vec::new(),
            cursor_proximity: default_cursor_proximity(),
            max_file_size: default_max_file_size(),
            file_routing: default_true(),
            sync_env_files: default_true(),
            environment_file: default_environment_file(),
        }
    }
}

impl WorkbenchConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.cursor_proximity == 0 {
            return Err("cursorProximity must be greater than 0".to_string());
        }

        if self.max_file_size == 0 {
            return Err("maxFileSize must be greater than 0".to_string());
        }

        if self.environment_file.trim().is_empty() {
            return Err("environmentFile must not be empty".to_string());
        }

        Ok(())
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// Ignored directory lists are concatenated rather than replaced.
    pub fn merge(&self, other: &WorkbenchConfig) -> Self {
        let mut extra_ignored_dirs = self.extra_ignored_dirs.clone();
        for dir in &other.extra_ignored_dirs {
            if !extra_ignored_dirs.contains(dir) {
                extra_ignored_dirs.push(dir.clone());
            }
        }

        Self {
            extra_ignored_dirs,
            cursor_proximity: other.cursor_proximity,
            max_file_size: other.max_file_size,
            file_routing: other.file_routing,
            sync_env_files: other.sync_env_files,
            environment_file: other.environment_file.clone(),
        }
    }
}

// Default value functions for serde

fn default_cursor_proximity() -> usize {
    10
}

fn default_max_file_size() -> u64 {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_environment_file() -> String {
    ".rest-workbench/environments.json".to_string()
}
