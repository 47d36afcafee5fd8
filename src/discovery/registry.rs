//! Framework pattern registry.
//!
//! Maps each framework family to the conditions under which it applies to a
//! file and an ordered list of `(pattern, extractor)` rules. The scanning loop
//! in [`PatternRegistry::scan`] knows nothing about any particular framework;
//! adding one means registering another [`FamilySpec`].

use super::file_routes::route_path_for;
use super::lines::LineIndex;
use super::path::{extract_params, normalize_path};
use super::rules;
use super::source::FileContext;
use super::walker::SourceKind;
use crate::models::{DiscoveredEndpoint, Framework, HttpMethod};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

/// Method and raw path pulled out of one regex match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub method: HttpMethod,
    pub path: String,
}

impl Candidate {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Normalizes the path and attaches provenance.
    pub fn into_endpoint(self, file: &Path, line: usize, framework: Framework) -> DiscoveredEndpoint {
        let path = normalize_path(&self.path);
        let params = extract_params(&path);

        DiscoveredEndpoint {
            method: self.method,
            path,
            file: file.to_path_buf(),
            line,
            framework,
            params: (!params.is_empty()).then_some(params),
        }
    }
}

/// Turns a match into a candidate, or `None` to skip it.
pub type Extractor = fn(&Captures<'_>, &FileContext<'_>) -> Option<Candidate>;

/// One compiled pattern and the function that reads its captures.
pub struct Rule {
    pub pattern: Regex,
    pub extract: Extractor,
}

impl Rule {
    /// Compiles a built-in rule. Built-in patterns are static, so a compile
    /// failure is a programming error.
    pub fn new(pattern: &str, extract: Extractor) -> Self {
        Self {
            pattern: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("Invalid route pattern {:?}: {}", pattern, e)),
            extract,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// When a family applies to a file.
#[derive(Debug, Clone, Copy)]
pub enum Detection {
    /// Every file of a matching source kind.
    Always,
    /// Files containing at least one of these substrings.
    Signatures(&'static [&'static str]),
    /// Files containing a signature or sitting at a file-based route location.
    SignaturesOrRouteFile(&'static [&'static str]),
}

/// Everything the registry knows about one framework family.
#[derive(Debug)]
pub struct FamilySpec {
    pub framework: Framework,
    pub kind: SourceKind,
    pub detection: Detection,
    pub rules: Vec<Rule>,
}

impl FamilySpec {
    /// Whether this family should be run against `ctx`.
    pub fn applies_to(&self, ctx: &FileContext<'_>) -> bool {
        if ctx.kind != self.kind {
            return false;
        }

        match self.detection {
            Detection::Always => true,
            Detection::Signatures(signatures) => contains_any(ctx.content, signatures),
            Detection::SignaturesOrRouteFile(signatures) => {
                contains_any(ctx.content, signatures) || route_path_for(ctx.path).is_some()
            }
        }
    }
}

fn contains_any(content: &str, signatures: &[&str]) -> bool {
    signatures.iter().any(|s| content.contains(s))
}

/// Ordered collection of framework families.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    families: Vec<FamilySpec>,
}

static BUILTIN: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::builtin);

impl PatternRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry of built-in families, compiled once.
    pub fn global() -> &'static PatternRegistry {
        &BUILTIN
    }

    /// A registry holding every built-in family.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for family in rules::builtin_families() {
            registry.register(family);
        }
        registry
    }

    /// Appends a family. Families are tried in registration order.
    pub fn register(&mut self, family: FamilySpec) {
        self.families.push(family);
    }

    /// The families applicable to a file, in registration order.
    pub fn detect<'r>(&'r self, ctx: &FileContext<'_>) -> Vec<&'r FamilySpec> {
        self.families.iter().filter(|f| f.applies_to(ctx)).collect()
    }

    /// Rules registered for a framework.
    pub fn rules(&self, framework: Framework) -> &[Rule] {
        self.families
            .iter()
            .find(|f| f.framework == framework)
            .map(|f| f.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Runs every applicable family's rules over the file content.
    ///
    /// Returns `None` when no family applies, so callers can tell "no
    /// framework" apart from "framework but no routes". Endpoints are not
    /// deduplicated here.
    pub fn scan(&self, ctx: &FileContext<'_>) -> Option<Vec<DiscoveredEndpoint>> {
        let families = self.detect(ctx);
        if families.is_empty() {
            return None;
        }

        let index = LineIndex::new(ctx.content);
        let mut endpoints = Vec::new();

        for family in families {
            for rule in &family.rules {
                // A fresh iterator per rule: no search state leaks between patterns
                for caps in rule.pattern.captures_iter(ctx.content) {
                    let start = match caps.get(0) {
                        Some(m) => m.start(),
                        None => continue,
                    };
                    if let Some(candidate) = (rule.extract)(&caps, ctx) {
                        endpoints.push(candidate.into_endpoint(
                            ctx.path,
                            index.line_of(start),
                            family.framework,
                        ));
                    }
                }
            }
        }

        Some(endpoints)
    }
}
