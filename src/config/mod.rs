//! Configuration management for REST Workbench.
//!
//! Scan and environment settings live in one process-wide [`WorkbenchConfig`].
//! The host passes its settings JSON to [`load_config`]; only the
//! "rest-workbench" section is read, and unknown or missing fields fall back
//! to defaults.

pub mod schema;

pub use schema::WorkbenchConfig;

use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::RwLock;

/// Settings key holding this crate's configuration.
pub const SETTINGS_KEY: &str = "rest-workbench";

/// Process-wide settings read by `discover_endpoints` and `endpoint_at_cursor`.
static CONFIG: Lazy<RwLock<WorkbenchConfig>> =
    Lazy::new(|| RwLock::new(WorkbenchConfig::default()));

/// Loads configuration from editor settings.
///
/// Reads the "rest-workbench" settings, merges them with defaults, validates
/// the result, and updates the global configuration.
///
/// # Returns
///
/// `Ok(WorkbenchConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use rest_workbench::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-workbench": {
///         "cursorProximity": 5,
///         "extraIgnoredDirs": ["generated"]
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.cursor_proximity, 5);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<WorkbenchConfig, String> {
    let mut config = WorkbenchConfig::default();

    if let Some(settings) = settings_json {
        if let Some(workbench_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<WorkbenchConfig>(workbench_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY, e
                    );
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}. Using defaults.", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns the default configuration if nothing has been loaded yet.
pub fn get_config() -> WorkbenchConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| WorkbenchConfig::default())
}

/// Updates the global configuration in place.
///
/// Reverts to defaults if the updated configuration does not validate.
///
/// # Example
///
/// ```no_run
/// use rest_workbench::config::update_config;
///
/// update_config(|config| {
///     config.file_routing = false;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut WorkbenchConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!("Configuration validation failed after update: {}", e);
            *config = WorkbenchConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = WorkbenchConfig::default();
    }
}
