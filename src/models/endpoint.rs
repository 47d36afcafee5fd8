//! Discovered endpoint data models.
//!
//! A [`DiscoveredEndpoint`] is the hand-off record between the scanner and
//! whatever consumes it (editor UI, CLI, importers). Its serialized field
//! names are part of that contract.

use super::method::HttpMethod;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pattern family that produced an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Fastify,
    Hono,
    Koa,
    NestJs,
    NextJs,
    FastApi,
    Flask,
    Go,
    Spring,
    Rust,
    Laravel,
}

impl Framework {
    /// Every family, in registry order.
    pub const ALL: [Framework; 12] = [
        Framework::Express,
        Framework::Fastify,
        Framework::Hono,
        Framework::Koa,
        Framework::NestJs,
        Framework::NextJs,
        Framework::FastApi,
        Framework::Flask,
        Framework::Go,
        Framework::Spring,
        Framework::Rust,
        Framework::Laravel,
    ];

    /// Identifier used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Express => "express",
            Framework::Fastify => "fastify",
            Framework::Hono => "hono",
            Framework::Koa => "koa",
            Framework::NestJs => "nestjs",
            Framework::NextJs => "nextjs",
            Framework::FastApi => "fastapi",
            Framework::Flask => "flask",
            Framework::Go => "go",
            Framework::Spring => "spring",
            Framework::Rust => "rust",
            Framework::Laravel => "laravel",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP route found in scanned source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEndpoint {
    /// HTTP verb, serialized uppercase.
    pub method: HttpMethod,

    /// Route template, always rooted at `/`.
    ///
    /// Parameter placeholders keep the framework's native syntax
    /// (`:id`, `{id}`, `[id]`, `<id>`).
    pub path: String,

    /// Absolute path of the source file containing the route.
    pub file: PathBuf,

    /// Zero-based line of the match start.
    pub line: usize,

    /// Pattern family that matched.
    pub framework: Framework,

    /// Path parameter names in order of appearance, absent when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,
}

impl DiscoveredEndpoint {
    /// Dedup identity of an endpoint: `(method, path, file)`.
    pub fn key(&self) -> (HttpMethod, &str, &std::path::Path) {
        (self.method, self.path.as_str(), self.file.as_path())
    }

    /// Short human-readable label, e.g. `GET /users/:id`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
