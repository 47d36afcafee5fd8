//! Environment persistence.
//!
//! [`EnvironmentStore`] is the seam between the session and wherever the
//! environments live. The session loads once on construction and saves the
//! whole collection after every mutation.

use super::models::Environments;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

/// Errors raised while loading or saving environments.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(io::Error),

    /// The stored document is not a valid environment list.
    Serialization(serde_json::Error),

    /// An in-memory store's lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "Environment store I/O error: {}", err),
            StoreError::Serialization(err) => {
                write!(f, "Environment store serialization error: {}", err)
            }
            StoreError::LockPoisoned => write!(f, "Environment store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Serialization(err) => Some(err),
            StoreError::LockPoisoned => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

/// Where a session's environments are kept.
pub trait EnvironmentStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Environments, StoreError>;

    fn save(&self, environments: &Environments) -> Result<(), StoreError>;
}

/// Keeps environments in memory only. Useful for tests and for hosts that
/// persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    environments: RwLock<Environments>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnvironmentStore for MemoryStore {
    fn load(&self) -> Result<Environments, StoreError> {
        self.environments
            .read()
            .map(|envs| envs.clone())
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn save(&self, environments: &Environments) -> Result<(), StoreError> {
        let mut stored = self
            .environments
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        *stored = environments.clone();
        Ok(())
    }
}

/// Stores environments as a pretty-printed JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EnvironmentStore for JsonFileStore {
    /// A missing file is an empty store.
    fn load(&self) -> Result<Environments, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Environments::new()),
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Environments::new());
        }

        let environments: Environments = serde_json::from_str(&content)?;
        Ok(Environments::from_vec(environments.environments))
    }

    fn save(&self, environments: &Environments) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(environments)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
