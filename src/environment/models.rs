//! Environment data models
//!
//! An environment is a named set of variables. At most one environment in a
//! collection is active at a time; interpolation reads the active one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Represents a single environment with its variables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Stable identifier (UUID v4)
    pub id: String,

    /// Display name (e.g., "dev", "Development (.env.development)")
    pub name: String,

    /// Variable key-value pairs for this environment
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// The `.env` file this environment was synthesized from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl Environment {
    /// Creates a new, inactive environment with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            variables: HashMap::new(),
            is_active: false,
            created_at: now,
            updated_at: now,
            source_file: None,
        }
    }

    /// Creates a new environment with name and variables
    pub fn with_variables(name: impl Into<String>, variables: HashMap<String, String>) -> Self {
        Self {
            variables,
            ..Self::new(name)
        }
    }

    /// Gets a variable value by name
    pub fn get(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    /// Sets a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Checks if a variable exists
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Bumps `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns the number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the environment has no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Ordered collection of environments
///
/// Serialized as a plain JSON array. Insertion order is kept and decides
/// which environment is promoted when the active one is deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Environments {
    pub environments: Vec<Environment>,
}

impl Environments {
    /// Creates a new empty Environments collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps loaded environments, repairing the active flags.
    pub fn from_vec(environments: Vec<Environment>) -> Self {
        let mut envs = Self { environments };
        envs.normalize_active();
        envs
    }

    /// Adds an environment to the end of the collection
    ///
    /// An environment arriving with its active flag set takes over as the
    /// active one.
    pub fn add_environment(&mut self, env: Environment) {
        let activate = env.is_active.then(|| env.id.clone());
        self.environments.push(env);

        if let Some(id) = activate {
            self.set_active(&id);
        }
    }

    /// Gets an environment by id
    pub fn get(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    /// Gets a mutable reference to an environment by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Environment> {
        self.environments.iter_mut().find(|e| e.id == id)
    }

    /// Finds the environment synthesized from a `.env` file
    pub fn find_by_source_mut(&mut self, source: &Path) -> Option<&mut Environment> {
        self.environments
            .iter_mut()
            .find(|e| e.source_file.as_deref() == Some(source))
    }

    /// Makes `id` the only active environment. All flags change in one pass.
    ///
    /// Returns false, leaving the flags untouched, when `id` is unknown.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        for env in &mut self.environments {
            env.is_active = env.id == id;
        }
        true
    }

    /// Gets the currently active environment
    pub fn get_active(&self) -> Option<&Environment> {
        self.environments.iter().find(|e| e.is_active)
    }

    /// Removes an environment by id.
    ///
    /// Deleting the active environment promotes the first remaining one.
    pub fn remove(&mut self, id: &str) -> Option<Environment> {
        let index = self.environments.iter().position(|e| e.id == id)?;
        let removed = self.environments.remove(index);

        if removed.is_active {
            if let Some(first) = self.environments.first_mut() {
                first.is_active = true;
            }
        }

        Some(removed)
    }

    /// Keeps only the first active flag when a hand-edited store has several.
    pub fn normalize_active(&mut self) {
        let mut seen = false;
        for env in &mut self.environments {
            if env.is_active && seen {
                env.is_active = false;
            }
            seen |= env.is_active;
        }
    }

    /// Iterates environments in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Environment> {
        self.environments.iter()
    }

    /// Lists all environment names
    pub fn list_environments(&self) -> Vec<String> {
        self.environments.iter().map(|e| e.name.clone()).collect()
    }

    /// Returns the number of environments
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Checks if there are no environments
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(envs: &Environments) -> usize {
        envs.iter().filter(|e| e.is_active).count()
    }

    #[test]
    fn test_environment_new() {
        let env = Environment::new("dev");
        assert_eq!(env.name, "dev");
        assert!(env.variables.is_empty());
        assert!(!env.is_active);
        assert!(Uuid::parse_str(&env.id).is_ok());
        assert_eq!(env.created_at, env.updated_at);
    }

    #[test]
    fn test_environment_with_variables() {
        let mut vars = HashMap::new();
        vars.insert("baseUrl".to_string(), "http://localhost:3000".to_string());
        vars.insert("apiKey".to_string(), "dev-key-123".to_string());

        let env = Environment::with_variables("dev", vars);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("baseUrl").unwrap(), "http://localhost:3000");
        assert!(env.contains("apiKey"));
        assert!(!env.contains("missing"));
    }

    #[test]
    fn test_set_active_flips_all_flags() {
        let mut envs = Environments::new();
        let dev = Environment::new("dev");
        let prod = Environment::new("prod");
        let (dev_id, prod_id) = (dev.id.clone(), prod.id.clone());
        envs.add_environment(dev);
        envs.add_environment(prod);

        assert!(envs.set_active(&dev_id));
        assert!(envs.set_active(&prod_id));
        assert_eq!(active_count(&envs), 1);
        assert_eq!(envs.get_active().unwrap().name, "prod");
    }

    #[test]
    fn test_set_active_unknown_id() {
        let mut envs = Environments::new();
        let dev = Environment::new("dev");
        let dev_id = dev.id.clone();
        envs.add_environment(dev);
        envs.set_active(&dev_id);

        assert!(!envs.set_active("nonexistent"));
        assert_eq!(envs.get_active().unwrap().id, dev_id);
    }

    #[test]
    fn test_add_active_environment_takes_over() {
        let mut envs = Environments::new();
        let mut first = Environment::new("first");
        first.is_active = true;
        envs.add_environment(first);

        let mut second = Environment::new("second");
        second.is_active = true;
        envs.add_environment(second);

        assert_eq!(active_count(&envs), 1);
        assert_eq!(envs.get_active().unwrap().name, "second");
    }

    #[test]
    fn test_remove_active_promotes_first_remaining() {
        let mut envs = Environments::new();
        let a = Environment::new("a");
        let b = Environment::new("b");
        let c = Environment::new("c");
        let (a_id, c_id) = (a.id.clone(), c.id.clone());
        envs.add_environment(a);
        envs.add_environment(b);
        envs.add_environment(c);
        envs.set_active(&c_id);

        let removed = envs.remove(&c_id).unwrap();
        assert_eq!(removed.name, "c");
        assert_eq!(envs.get_active().unwrap().id, a_id);
    }

    #[test]
    fn test_remove_inactive_keeps_active() {
        let mut envs = Environments::new();
        let a = Environment::new("a");
        let b = Environment::new("b");
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        envs.add_environment(a);
        envs.add_environment(b);
        envs.set_active(&b_id);

        envs.remove(&a_id);
        assert_eq!(envs.get_active().unwrap().id, b_id);
        assert!(envs.remove("missing").is_none());
    }

    #[test]
    fn test_remove_last_environment() {
        let mut envs = Environments::new();
        let only = Environment::new("only");
        let id = only.id.clone();
        envs.add_environment(only);
        envs.set_active(&id);

        envs.remove(&id);
        assert!(envs.is_empty());
        assert!(envs.get_active().is_none());
    }

    #[test]
    fn test_from_vec_repairs_multiple_active() {
        let mut a = Environment::new("a");
        a.is_active = true;
        let mut b = Environment::new("b");
        b.is_active = true;

        let envs = Environments::from_vec(vec![a, b]);
        assert_eq!(active_count(&envs), 1);
        assert_eq!(envs.get_active().unwrap().name, "a");
    }

    #[test]
    fn test_serialization_shape() {
        let mut env = Environment::new("dev");
        env.set("url", "http://dev");
        env.is_active = true;
        let envs = Environments::from_vec(vec![env]);

        let json = serde_json::to_value(&envs).unwrap();
        let first = &json.as_array().unwrap()[0];
        assert_eq!(first["isActive"], true);
        assert_eq!(first["variables"]["url"], "http://dev");
        assert!(first.get("createdAt").is_some());
        assert!(first.get("sourceFile").is_none());

        let back: Environments = serde_json::from_value(json).unwrap();
        assert_eq!(back, envs);
    }
}
