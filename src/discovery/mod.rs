//! Endpoint discovery.
//!
//! A best-effort static scanner: walks a source tree, decides per file which
//! framework families apply, runs their route patterns and collects the
//! matches as [`DiscoveredEndpoint`]s with file and line provenance. A second
//! pass derives routes from file-based routing conventions. Both passes feed
//! one deduplicated [`ScanReport`].
//!
//! Nothing here parses source code. A route built from variables, string
//! concatenation or nested router prefixes is invisible to the scanner, and
//! a pattern-shaped string in a comment is reported as a route.

pub mod cursor;
pub mod dedup;
pub mod error;
pub mod file_routes;
pub mod lines;
pub mod path;
pub mod registry;
pub mod report;
pub mod rules;
pub mod source;
pub mod walker;

pub use cursor::{find_endpoint_near_line, DEFAULT_CURSOR_PROXIMITY};
pub use dedup::dedup_endpoints;
pub use error::{DiscoveryError, SkipReason, WalkError};
pub use registry::PatternRegistry;
pub use report::{FileOutcome, ScanReport};
pub use walker::{SourceKind, SourceWalker};

use crate::config::{get_config, WorkbenchConfig};
use crate::models::DiscoveredEndpoint;
use log::{debug, info, warn};
use source::{read_source, FileContext};
use std::fs;
use std::path::{Path, PathBuf};

/// Scans one root directory with the given configuration.
///
/// Per-file and per-directory failures are recorded in the report; only an
/// invalid root fails the whole scan. A relative root is resolved first, so
/// every reported `file` is absolute.
pub fn scan_directory(root: &Path, config: &WorkbenchConfig) -> Result<ScanReport, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::InvalidRoot(root.to_path_buf()));
    }
    let root = absolute_root(root)?;
    let root = root.as_path();

    let walker = SourceWalker::new(&config.extra_ignored_dirs);
    let registry = PatternRegistry::global();

    let walked = walker.walk(root);
    let mut outcomes = Vec::with_capacity(walked.files.len());
    for file in walked.files {
        let outcome = scan_file(registry, &file, config.max_file_size);
        outcomes.push(outcome);
    }
    let mut walk_errors = walked.errors;

    if config.file_routing {
        let (routed, mut listing) = file_routes::scan_file_routes(root, &walker, config.max_file_size);
        outcomes.extend(routed);
        walk_errors.append(&mut listing.errors);
    }

    let report = ScanReport::from_outcomes(outcomes, walk_errors);
    info!(
        "Scanned {}: {} endpoints in {} files ({} skipped, {} walk errors)",
        root.display(),
        report.endpoints.len(),
        report.scanned_count(),
        report.skipped().count(),
        report.walk_errors.len()
    );

    Ok(report)
}

fn absolute_root(root: &Path) -> Result<PathBuf, DiscoveryError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .map_err(|_| DiscoveryError::InvalidRoot(root.to_path_buf()))
}

fn scan_file(registry: &PatternRegistry, file: &Path, max_file_size: u64) -> FileOutcome {
    let kind = match SourceKind::from_path(file) {
        Some(kind) => kind,
        None => {
            return FileOutcome::Skipped {
                file: file.to_path_buf(),
                reason: SkipReason::NoFramework,
            }
        }
    };

    let content = match read_source(file, max_file_size) {
        Ok(content) => content,
        Err(reason) => {
            warn!("Skipping {}: {}", file.display(), reason);
            return FileOutcome::Skipped {
                file: file.to_path_buf(),
                reason,
            };
        }
    };

    match registry.scan(&FileContext::new(file, kind, &content)) {
        Some(endpoints) => {
            debug!("{}: {} endpoints", file.display(), endpoints.len());
            FileOutcome::Scanned {
                file: file.to_path_buf(),
                endpoints,
            }
        }
        None => FileOutcome::Skipped {
            file: file.to_path_buf(),
            reason: SkipReason::NoFramework,
        },
    }
}

/// Discovers the endpoints under `root` using the global configuration.
pub fn discover_endpoints(root: &Path) -> Result<Vec<DiscoveredEndpoint>, DiscoveryError> {
    scan_directory(root, &get_config()).map(|report| report.endpoints)
}

/// Scans every workspace folder in order, merging the reports.
///
/// An empty folder list is [`DiscoveryError::NoWorkspace`], never an empty
/// success.
pub fn discover_workspace(folders: &[PathBuf]) -> Result<ScanReport, DiscoveryError> {
    let (first, rest) = folders.split_first().ok_or(DiscoveryError::NoWorkspace)?;

    let config = get_config();
    let mut report = scan_directory(first, &config)?;
    for folder in rest {
        report = report.merge(scan_directory(folder, &config)?);
    }

    Ok(report)
}

/// Scans a single in-memory document, e.g. an unsaved editor buffer.
///
/// Only the pattern families apply unless the file sits at a file-based
/// route location, in which case its handlers are included as well.
pub fn scan_document(file: &Path, content: &str) -> Vec<DiscoveredEndpoint> {
    let kind = match SourceKind::from_path(file) {
        Some(kind) => kind,
        None => return Vec::new(),
    };

    let ctx = FileContext::new(file, kind, content);
    let found = PatternRegistry::global().scan(&ctx).unwrap_or_default();
    let routed = file_routes::scan_route_file(file, content);

    dedup_endpoints(found.into_iter().chain(routed))
}

/// The endpoint a cursor on `line` of a document belongs to, if any.
pub fn endpoint_at_cursor(file: &Path, content: &str, line: usize) -> Option<DiscoveredEndpoint> {
    let endpoints = scan_document(file, content);
    let proximity = get_config().cursor_proximity;
    find_endpoint_near_line(&endpoints, line, proximity).cloned()
}

/// Runs [`discover_endpoints`] on the blocking pool.
#[cfg(feature = "async")]
pub async fn discover_endpoints_async(root: PathBuf) -> Result<Vec<DiscoveredEndpoint>, DiscoveryError> {
    tokio::task::spawn_blocking(move || discover_endpoints(&root))
        .await
        .map_err(|e| DiscoveryError::Aborted(e.to_string()))?
}
