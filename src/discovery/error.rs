//! Discovery error and skip types.
//!
//! Only [`DiscoveryError`] ever reaches the caller as an `Err`. Everything that
//! goes wrong for a single file or directory is recorded as a [`SkipReason`]
//! or [`WalkError`] in the scan report and the scan carries on.

use std::fmt;
use std::path::PathBuf;

/// Errors that stop a discovery request before any file is scanned.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// No workspace folder is open, so there is nothing to scan.
    NoWorkspace,

    /// The scan root does not exist or is not a directory.
    InvalidRoot(PathBuf),

    /// The background scan task died before producing a result.
    Aborted(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NoWorkspace => write!(f, "No workspace folder is open"),
            DiscoveryError::InvalidRoot(path) => {
                write!(f, "Scan root is not a directory: {}", path.display())
            }
            DiscoveryError::Aborted(msg) => write!(f, "Endpoint scan aborted: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Why a candidate source file produced no endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Reading the file failed (permissions, vanished mid-scan, ...).
    Unreadable(String),

    /// The file content is not valid UTF-8.
    NotUtf8,

    /// The file exceeds the configured size limit.
    TooLarge { size: u64, limit: u64 },

    /// No framework signature matched the file.
    NoFramework,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
            SkipReason::NotUtf8 => write!(f, "not valid UTF-8"),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "too large ({} bytes, limit {})", size, limit)
            }
            SkipReason::NoFramework => write!(f, "no framework signature"),
        }
    }
}

/// A directory entry the walker could not read.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkError {
    /// Path that failed, when the walker knows it.
    pub path: Option<PathBuf>,

    /// Underlying error message.
    pub message: String,
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<walkdir::Error> for WalkError {
    fn from(err: walkdir::Error) -> Self {
        WalkError {
            path: err.path().map(|p| p.to_path_buf()),
            message: err
                .io_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| err.to_string()),
        }
    }
}
