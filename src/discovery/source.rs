//! Source file loading.

use super::error::SkipReason;
use super::walker::SourceKind;
use std::fs;
use std::path::Path;

/// A source file under scan: where it lives, what language it is, what it says.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a Path,
    pub kind: SourceKind,
    pub content: &'a str,
}

impl<'a> FileContext<'a> {
    pub fn new(path: &'a Path, kind: SourceKind, content: &'a str) -> Self {
        Self {
            path,
            kind,
            content,
        }
    }
}

/// Reads a source file, enforcing the size limit and UTF-8 decoding.
pub fn read_source(path: &Path, max_size: u64) -> Result<String, SkipReason> {
    let metadata = fs::metadata(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    if metadata.len() > max_size {
        return Err(SkipReason::TooLarge {
            size: metadata.len(),
            limit: max_size,
        });
    }

    let bytes = fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)
}
