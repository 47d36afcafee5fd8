//! Environment management module
//!
//! Environments are named variable sets; exactly the active one feeds
//! interpolation. [`EnvironmentSession`] owns the collection, keeps the
//! single-active invariant and persists every change through an
//! [`EnvironmentStore`]. Workspace `.env` files are mirrored as
//! file-derived environments by [`EnvironmentSession::sync_env_files`].
//!
//! # Example
//!
//! ```no_run
//! use rest_workbench::config::WorkbenchConfig;
//! use rest_workbench::environment::EnvironmentSession;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let workspace = Path::new("/path/to/workspace");
//! let session = EnvironmentSession::open(workspace, &WorkbenchConfig::default()).unwrap();
//!
//! let dev = session.create("dev", HashMap::from([("baseUrl".into(), "http://localhost".into())])).unwrap();
//! session.set_active(&dev.id).unwrap();
//!
//! assert_eq!(session.interpolate("{{baseUrl}}/users", &HashMap::new()), "http://localhost/users");
//! ```

pub mod dotenv;
pub mod loader;
pub mod models;
pub mod store;

use crate::config::WorkbenchConfig;
use crate::variables;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

// Re-export public types for convenience
pub use dotenv::{is_env_file, parse_env_file, read_env_files, EnvFile, EnvTier};
pub use loader::{export_environment, import_environment, EnvError};
pub use models::{Environment, Environments};
pub use store::{EnvironmentStore, JsonFileStore, MemoryStore, StoreError};

/// Names of the environments a `.env` sync touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Session manager for environments
///
/// Cloning is cheap and clones share state. Every mutation runs under one
/// write lock on a copy of the collection, is saved through the store, and
/// only then replaces the shared collection; a failed save leaves the
/// session unchanged.
#[derive(Debug, Clone)]
pub struct EnvironmentSession {
    /// The loaded environments (wrapped in Arc<RwLock> for thread-safe shared access)
    environments: Arc<RwLock<Environments>>,

    store: Arc<dyn EnvironmentStore>,
}

impl EnvironmentSession {
    /// Creates a session from whatever `store` currently holds
    pub fn new(store: Arc<dyn EnvironmentStore>) -> Result<Self, EnvError> {
        let environments = store.load()?;
        debug!("Loaded {} environments", environments.len());

        Ok(Self {
            environments: Arc::new(RwLock::new(environments)),
            store,
        })
    }

    /// A session backed by a [`MemoryStore`], starting empty
    pub fn in_memory() -> Self {
        Self {
            environments: Arc::new(RwLock::new(Environments::new())),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Opens the workspace's JSON store at `config.environment_file` and,
    /// when enabled, mirrors the workspace `.env` files.
    pub fn open(workspace_root: &Path, config: &WorkbenchConfig) -> Result<Self, EnvError> {
        let store = JsonFileStore::new(workspace_root.join(&config.environment_file));
        let session = Self::new(Arc::new(store))?;

        if config.sync_env_files {
            session.sync_env_files(workspace_root)?;
        }

        Ok(session)
    }

    fn read<T>(&self, f: impl FnOnce(&Environments) -> T) -> Option<T> {
        self.environments.read().ok().map(|envs| f(&envs))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Environments) -> Result<T, EnvError>,
    ) -> Result<T, EnvError> {
        let mut envs = self
            .environments
            .write()
            .map_err(|_| EnvError::LockPoisoned)?;

        let mut next = envs.clone();
        let result = f(&mut next)?;
        self.store.save(&next)?;
        *envs = next;

        Ok(result)
    }

    /// Creates a new, inactive environment
    pub fn create(
        &self,
        name: &str,
        variables: HashMap<String, String>,
    ) -> Result<Environment, EnvError> {
        let name = validate_name(name)?;
        let env = Environment::with_variables(name, variables);

        self.mutate(|envs| {
            envs.add_environment(env.clone());
            Ok(env)
        })
    }

    /// Adds an already built environment, e.g. one from [`import_environment`]
    pub fn add(&self, env: Environment) -> Result<Environment, EnvError> {
        self.mutate(|envs| {
            envs.add_environment(env);
            envs.environments
                .last()
                .cloned()
                .ok_or_else(|| EnvError::InvalidFormat("environment was not added".to_string()))
        })
    }

    /// Parses an export document and adds it. `Ok(None)` for malformed JSON.
    pub fn import(&self, json: &str) -> Result<Option<Environment>, EnvError> {
        match import_environment(json) {
            Some(env) => self.add(env).map(Some),
            None => Ok(None),
        }
    }

    /// Replaces an environment's variables
    pub fn update_variables(
        &self,
        id: &str,
        variables: HashMap<String, String>,
    ) -> Result<Environment, EnvError> {
        self.mutate(|envs| {
            let env = envs
                .get_mut(id)
                .ok_or_else(|| EnvError::NotFound(id.to_string()))?;
            env.variables = variables;
            env.touch();
            Ok(env.clone())
        })
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<Environment, EnvError> {
        let name = validate_name(name)?;
        self.mutate(|envs| {
            let env = envs
                .get_mut(id)
                .ok_or_else(|| EnvError::NotFound(id.to_string()))?;
            env.name = name;
            env.touch();
            Ok(env.clone())
        })
    }

    /// Copies an environment under `"<name> (copy)"`. The copy is inactive
    /// and not tied to any `.env` file.
    pub fn duplicate(&self, id: &str) -> Result<Environment, EnvError> {
        self.mutate(|envs| {
            let source = envs
                .get(id)
                .ok_or_else(|| EnvError::NotFound(id.to_string()))?;
            let copy = Environment::with_variables(
                format!("{} (copy)", source.name),
                source.variables.clone(),
            );
            envs.add_environment(copy.clone());
            Ok(copy)
        })
    }

    /// Deletes an environment, promoting the first remaining one if it was active
    pub fn delete(&self, id: &str) -> Result<Environment, EnvError> {
        self.mutate(|envs| {
            envs.remove(id)
                .ok_or_else(|| EnvError::NotFound(id.to_string()))
        })
    }

    /// All environments in insertion order
    pub fn list(&self) -> Vec<Environment> {
        self.read(|envs| envs.environments.clone()).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<Environment> {
        self.read(|envs| envs.get(id).cloned()).flatten()
    }

    /// Gets the currently active environment
    pub fn get_active(&self) -> Option<Environment> {
        self.read(|envs| envs.get_active().cloned()).flatten()
    }

    /// Makes `id` the only active environment
    pub fn set_active(&self, id: &str) -> Result<(), EnvError> {
        self.mutate(|envs| {
            if envs.set_active(id) {
                Ok(())
            } else {
                Err(EnvError::NotFound(id.to_string()))
            }
        })
    }

    /// Interpolates `text` from `overrides`, then the active environment
    pub fn interpolate(&self, text: &str, overrides: &HashMap<String, String>) -> String {
        self.read(|envs| variables::interpolate(text, overrides, envs.get_active()))
            .unwrap_or_else(|| variables::interpolate(text, overrides, None))
    }

    /// Re-synthesizes the file-derived environments from the `.env` files in
    /// `root`.
    ///
    /// Existing file-derived environments keep their id and active flag and
    /// get the file's current variables; new files add inactive environments;
    /// environments whose file is gone are deleted.
    pub fn sync_env_files(&self, root: &Path) -> Result<SyncReport, EnvError> {
        let files = read_env_files(root)?;

        let report = self.mutate(|envs| Ok(apply_env_files(envs, files)))?;
        if !report.is_empty() {
            info!(
                "Synced .env files in {}: {} added, {} updated, {} removed",
                root.display(),
                report.added.len(),
                report.updated.len(),
                report.removed.len()
            );
        }

        Ok(report)
    }
}

fn validate_name(name: &str) -> Result<String, EnvError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EnvError::InvalidFormat(
            "environment name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn apply_env_files(envs: &mut Environments, files: Vec<EnvFile>) -> SyncReport {
    let mut report = SyncReport::default();
    let present: HashSet<PathBuf> = files.iter().map(|f| f.path.clone()).collect();

    for file in files {
        let name = file.environment_name();
        match envs.find_by_source_mut(&file.path) {
            Some(env) => {
                if env.variables != file.variables || env.name != name {
                    env.variables = file.variables;
                    env.name = name.clone();
                    env.touch();
                    report.updated.push(name);
                }
            }
            None => {
                let mut env = Environment::with_variables(name.clone(), file.variables);
                env.source_file = Some(file.path);
                envs.add_environment(env);
                report.added.push(name);
            }
        }
    }

    let vanished: Vec<String> = envs
        .iter()
        .filter(|env| matches!(&env.source_file, Some(path) if !present.contains(path)))
        .map(|env| env.id.clone())
        .collect();

    for id in vanished {
        if let Some(env) = envs.remove(&id) {
            report.removed.push(env.name);
        }
    }

    report
}
