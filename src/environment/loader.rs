//! Environment import and export
//!
//! Imports accept the native `{ "name", "variables" }` document and the
//! Postman environment export (`{ "name", "values": [{ "key", "value",
//! "enabled" }] }`). Exports always use the native shape.

use super::models::Environment;
use super::store::StoreError;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Errors raised by environment session operations
#[derive(Debug)]
pub enum EnvError {
    /// No environment has the given id
    NotFound(String),

    /// Invalid input, e.g. an empty name
    InvalidFormat(String),

    /// The environment list lock was poisoned by a panicking writer
    LockPoisoned,

    /// Persisting or loading the environment list failed
    Store(StoreError),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::NotFound(id) => write!(f, "Environment '{}' not found", id),
            EnvError::InvalidFormat(msg) => write!(f, "Invalid environment: {}", msg),
            EnvError::LockPoisoned => write!(f, "Environment lock poisoned"),
            EnvError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EnvError {
    fn from(err: StoreError) -> Self {
        EnvError::Store(err)
    }
}

impl From<std::io::Error> for EnvError {
    fn from(err: std::io::Error) -> Self {
        EnvError::Store(StoreError::Io(err))
    }
}

/// Native export document
#[derive(Debug, Serialize, Deserialize)]
struct ExportedEnvironment {
    name: String,
    #[serde(default)]
    variables: HashMap<String, String>,
}

/// One entry of a Postman environment's `values` array
#[derive(Debug, Deserialize)]
struct PostmanValue {
    key: String,
    #[serde(default)]
    value: Value,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Parses an exported environment document.
///
/// Returns a new, inactive environment with a fresh id and timestamps, or
/// `None` (logged) when the JSON is malformed or has neither `variables` nor
/// `values`. Disabled Postman values are skipped.
///
/// # Example
///
/// ```
/// use rest_workbench::environment::import_environment;
///
/// let env = import_environment(r#"{"name":"dev","variables":{"baseUrl":"http://x"}}"#).unwrap();
/// assert_eq!(env.name, "dev");
/// assert_eq!(env.get("baseUrl").unwrap(), "http://x");
/// assert!(!env.is_active);
///
/// assert!(import_environment("not json").is_none());
/// ```
pub fn import_environment(json: &str) -> Option<Environment> {
    let raw: Value = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to parse environment import: {}", e);
            return None;
        }
    };

    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            warn!("Environment import must be a JSON object");
            return None;
        }
    };

    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            warn!("Environment import has no name");
            return None;
        }
    };

    let variables = if let Some(values) = obj.get("values") {
        parse_postman_values(values)?
    } else if let Some(variables) = obj.get("variables") {
        parse_variable_map(variables)?
    } else {
        warn!("Environment import '{}' has no variables or values", name);
        return None;
    };

    Some(Environment::with_variables(name, variables))
}

fn parse_postman_values(values: &Value) -> Option<HashMap<String, String>> {
    let entries: Vec<PostmanValue> = match serde_json::from_value(values.clone()) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid Postman values array: {}", e);
            return None;
        }
    };

    Some(
        entries
            .into_iter()
            .filter(|entry| entry.enabled)
            .map(|entry| (entry.key, value_to_string(&entry.value)))
            .collect(),
    )
}

fn parse_variable_map(variables: &Value) -> Option<HashMap<String, String>> {
    let obj = match variables.as_object() {
        Some(obj) => obj,
        None => {
            warn!("Environment variables must be a JSON object");
            return None;
        }
    };

    Some(
        obj.iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect(),
    )
}

/// Scalars are kept as their text; anything else as compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Serializes an environment as a pretty `{ "name", "variables" }` document.
pub fn export_environment(env: &Environment) -> String {
    let exported = ExportedEnvironment {
        name: env.name.clone(),
        variables: env.variables.clone(),
    };

    // A struct of strings always serializes
    serde_json::to_string_pretty(&exported).unwrap_or_default()
}
