//! Placeholder interpolation
//!
//! Replaces `{{name}}` and `${name}` placeholders in request text. Names are
//! trimmed, looked up in the caller's overrides first and then in the active
//! environment. A placeholder nothing resolves stays in the output exactly as
//! written, so a partially configured template is still recognizable.
//!
//! Substitution is a single pass: values are inserted as-is and never
//! scanned for further placeholders.

use crate::environment::Environment;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

/// Cached regex matching `{{name}}` (group 1) or `${name}` (group 2), with
/// optional whitespace around the name.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}|\$\{\s*([^{}]+?)\s*\}")
        .expect("Failed to compile placeholder regex")
});

/// Variable sources for one interpolation, in priority order
#[derive(Debug, Clone, Copy)]
pub struct VariableContext<'a> {
    /// Caller-supplied bindings; win over the environment
    pub overrides: &'a HashMap<String, String>,

    /// The active environment, if any
    pub environment: Option<&'a Environment>,
}

impl<'a> VariableContext<'a> {
    pub fn new(overrides: &'a HashMap<String, String>, environment: Option<&'a Environment>) -> Self {
        Self {
            overrides,
            environment,
        }
    }

    /// Resolves a trimmed placeholder name
    pub fn resolve(&self, name: &str) -> Option<&'a str> {
        self.overrides
            .get(name)
            .or_else(|| self.environment.and_then(|env| env.get(name)))
            .map(String::as_str)
    }
}

fn placeholder_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

fn may_contain_placeholder(text: &str) -> bool {
    text.contains("{{") || text.contains("${")
}

/// Substitutes every placeholder the context can resolve.
pub fn substitute(text: &str, context: &VariableContext<'_>) -> String {
    if !may_contain_placeholder(text) {
        return text.to_string();
    }

    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            match placeholder_name(caps).and_then(|name| context.resolve(name)) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Interpolates `text` from `overrides`, then the `active` environment.
///
/// # Examples
///
/// ```
/// use rest_workbench::environment::Environment;
/// use rest_workbench::variables::interpolate;
/// use std::collections::HashMap;
///
/// let mut env = Environment::new("dev");
/// env.set("BASE_URL", "http://x");
///
/// let text = interpolate("{{BASE_URL}}/api?key=${ KEY }", &HashMap::new(), Some(&env));
/// assert_eq!(text, "http://x/api?key=${ KEY }");
/// ```
pub fn interpolate(
    text: &str,
    overrides: &HashMap<String, String>,
    active: Option<&Environment>,
) -> String {
    substitute(text, &VariableContext::new(overrides, active))
}

/// Placeholder names in order of first appearance, without duplicates.
pub fn find_placeholders(text: &str) -> Vec<String> {
    if !may_contain_placeholder(text) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter_map(|caps| placeholder_name(&caps).map(str::to_string))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Placeholder names that neither the overrides nor the active environment
/// can resolve.
pub fn unresolved_placeholders(
    text: &str,
    overrides: &HashMap<String, String>,
    active: Option<&Environment>,
) -> Vec<String> {
    let context = VariableContext::new(overrides, active);
    find_placeholders(text)
        .into_iter()
        .filter(|name| context.resolve(name).is_none())
        .collect()
}
