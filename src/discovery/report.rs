//! Structured scan results.

use super::dedup::dedup_endpoints;
use super::error::{SkipReason, WalkError};
use crate::models::DiscoveredEndpoint;
use std::path::{Path, PathBuf};

/// What happened to one candidate source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// The file was read and matched at least one framework family.
    Scanned {
        file: PathBuf,
        endpoints: Vec<DiscoveredEndpoint>,
    },

    /// The file was passed over.
    Skipped { file: PathBuf, reason: SkipReason },
}

impl FileOutcome {
    pub fn file(&self) -> &Path {
        match self {
            FileOutcome::Scanned { file, .. } | FileOutcome::Skipped { file, .. } => file,
        }
    }

    /// Endpoints found in the file, empty when skipped.
    pub fn endpoints(&self) -> &[DiscoveredEndpoint] {
        match self {
            FileOutcome::Scanned { endpoints, .. } => endpoints,
            FileOutcome::Skipped { .. } => &[],
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            FileOutcome::Skipped { reason, .. } => Some(reason),
            FileOutcome::Scanned { .. } => None,
        }
    }
}

/// Aggregate result of scanning one root.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Deduplicated endpoints in first-seen order.
    pub endpoints: Vec<DiscoveredEndpoint>,

    /// Per-file outcomes: the pattern pass first, then the file-based pass.
    pub files: Vec<FileOutcome>,

    /// Directories the walker could not read.
    pub walk_errors: Vec<WalkError>,
}

impl ScanReport {
    /// Builds a report from per-file outcomes, deduplicating their endpoints.
    pub fn from_outcomes(files: Vec<FileOutcome>, walk_errors: Vec<WalkError>) -> Self {
        let endpoints = dedup_endpoints(
            files
                .iter()
                .flat_map(|outcome| outcome.endpoints().iter().cloned()),
        );

        Self {
            endpoints,
            files,
            walk_errors,
        }
    }

    /// Files that were passed over, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &SkipReason)> {
        self.files
            .iter()
            .filter_map(|outcome| outcome.skip_reason().map(|r| (outcome.file(), r)))
    }

    /// Number of files that were read and matched a framework.
    pub fn scanned_count(&self) -> usize {
        self.files
            .iter()
            .filter(|outcome| matches!(outcome, FileOutcome::Scanned { .. }))
            .count()
    }

    /// Folds another report into this one, keeping endpoint uniqueness.
    pub fn merge(mut self, other: ScanReport) -> Self {
        self.files.extend(other.files);
        self.walk_errors.extend(other.walk_errors);
        let combined = self.endpoints.into_iter().chain(other.endpoints);
        self.endpoints = dedup_endpoints(combined);
        self
    }
}
