//! Source file selection.
//!
//! Walks a directory tree in file-name order, pruning dependency, build and
//! hidden directories, and keeps only files with a supported source extension.

use super::error::WalkError;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "out",
    "target",
    "vendor",
    "__pycache__",
    "venv",
    "env",
    "coverage",
    "bin",
    "obj",
    ".git",
    ".next",
    ".nuxt",
    ".venv",
];

/// JavaScript and TypeScript extensions.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Every extension the scanner reads.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "py", "go", "java", "rs", "php",
];

/// Language group of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Script,
    Python,
    Go,
    Java,
    Rust,
    Php,
}

impl SourceKind {
    /// Classifies `path` by extension, `None` for unsupported files.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(SourceKind::Python),
            "go" => Some(SourceKind::Go),
            "java" => Some(SourceKind::Java),
            "rs" => Some(SourceKind::Rust),
            "php" => Some(SourceKind::Php),
            e if SCRIPT_EXTENSIONS.contains(&e) => Some(SourceKind::Script),
            _ => None,
        }
    }
}

/// Files selected by a walk plus the directories that could not be read.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<PathBuf>,
    pub errors: Vec<WalkError>,
}

/// Recursive walker with a fixed ignore set.
#[derive(Debug, Clone)]
pub struct SourceWalker {
    ignored: HashSet<String>,
}

impl SourceWalker {
    /// Creates a walker pruning [`IGNORED_DIRS`] plus `extra_ignored`.
    pub fn new(extra_ignored: &[String]) -> Self {
        let mut ignored: HashSet<String> = IGNORED_DIRS.iter().map(|d| d.to_string()).collect();
        ignored.extend(extra_ignored.iter().cloned());
        Self { ignored }
    }

    /// Whether a directory with this name is pruned.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignored.contains(name)
    }

    /// Lists supported source files under `root`.
    ///
    /// Unreadable directories are logged and recorded; the walk continues
    /// with their siblings.
    pub fn walk(&self, root: &Path) -> WalkOutcome {
        self.walk_filtered(root, |path| SourceKind::from_path(path).is_some())
    }

    /// Lists files under `root` accepted by `keep`, applying the same pruning.
    pub fn walk_filtered<F>(&self, root: &Path, keep: F) -> WalkOutcome
    where
        F: Fn(&Path) -> bool,
    {
        let mut outcome = WalkOutcome::default();

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let err = WalkError::from(err);
                    warn!("Skipping unreadable directory entry: {}", err);
                    outcome.errors.push(err);
                    continue;
                }
            };

            if entry.file_type().is_file() && keep(entry.path()) {
                outcome.files.push(entry.into_path());
            }
        }

        debug!(
            "Walked {}: {} files selected, {} errors",
            root.display(),
            outcome.files.len(),
            outcome.errors.len()
        );

        outcome
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        // The root itself is never pruned, even if it is a hidden directory
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        entry
            .file_name()
            .to_str()
            .map(|name| self.is_ignored_dir(name))
            .unwrap_or(false)
    }
}

impl Default for SourceWalker {
    fn default() -> Self {
        Self::new(&[])
    }
}
