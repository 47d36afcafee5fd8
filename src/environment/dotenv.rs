//! `.env` file environments.
//!
//! Recognized `.env` files in the workspace root are mirrored as
//! environments named after their tier, e.g. `Development (.env.development)`.

use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Deployment tier a `.env` file stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvTier {
    Default,
    Local,
    Development,
    Staging,
    Production,
    Test,
}

impl EnvTier {
    /// Maps a file name to its tier, `None` for unrecognized names.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            ".env" => Some(EnvTier::Default),
            ".env.local" => Some(EnvTier::Local),
            ".env.development" | ".env.dev" => Some(EnvTier::Development),
            ".env.staging" => Some(EnvTier::Staging),
            ".env.production" | ".env.prod" => Some(EnvTier::Production),
            ".env.test" => Some(EnvTier::Test),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvTier::Default => "Default",
            EnvTier::Local => "Local",
            EnvTier::Development => "Development",
            EnvTier::Staging => "Staging",
            EnvTier::Production => "Production",
            EnvTier::Test => "Test",
        }
    }
}

impl fmt::Display for EnvTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `.env` file.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvFile {
    pub path: PathBuf,
    pub tier: EnvTier,
    pub variables: HashMap<String, String>,
}

impl EnvFile {
    /// The environment name this file is mirrored under.
    pub fn environment_name(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} ({})", self.tier, file_name)
    }
}

/// Whether `path` names a recognized `.env` file. Hosts use this to filter
/// file watcher events before calling a sync.
pub fn is_env_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(EnvTier::from_file_name)
        .is_some()
}

/// Parses `.env` content into bindings.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is allowed,
/// the line is split on the first `=`, and one level of matching `"` or `'`
/// quotes is stripped from the value. Lines without `=` are ignored.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
        let (key, value) = match line.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    vars
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Reads every recognized `.env` file directly inside `root`, in file name
/// order. Files that cannot be read are logged and left out.
pub fn read_env_files(root: &Path) -> io::Result<Vec<EnvFile>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_env_file(path))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let tier = match path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(EnvTier::from_file_name)
        {
            Some(tier) => tier,
            None => continue,
        };

        match fs::read_to_string(&path) {
            Ok(content) => files.push(EnvFile {
                variables: parse_env_file(&content),
                path,
                tier,
            }),
            Err(e) => warn!("Skipping env file {}: {}", path.display(), e),
        }
    }

    Ok(files)
}
