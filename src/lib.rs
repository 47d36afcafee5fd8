//! REST Workbench core
//!
//! The editor-independent half of an in-editor HTTP client: finding the HTTP
//! endpoints a project serves, and filling request templates from the active
//! environment. The host editor owns panels, commands and request execution
//! and calls into this crate for the analysis.
//!
//! # Architecture
//!
//! - **discovery**: walks a source tree and extracts routes with file/line
//!   provenance using per-framework regex heuristics
//! - **variables**: `{{name}}` / `${name}` interpolation
//! - **environment**: named variable sets, the single active environment,
//!   persistence and `.env` file mirroring
//! - **models**: the endpoint record and HTTP verb set
//! - **config**: settings read from the editor under `"rest-workbench"`
//!
//! Discovery and interpolation are independent of each other.
//!
//! # Usage
//!
//! ```no_run
//! use rest_workbench::discovery::discover_endpoints;
//! use rest_workbench::environment::EnvironmentSession;
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let endpoints = discover_endpoints(Path::new("/path/to/project")).unwrap();
//! for endpoint in &endpoints {
//!     println!("{} {}:{}", endpoint.label(), endpoint.file.display(), endpoint.line + 1);
//! }
//!
//! let session = EnvironmentSession::in_memory();
//! let url = session.interpolate("{{baseUrl}}/users", &HashMap::new());
//! ```

pub mod config;
pub mod discovery;
pub mod environment;
pub mod models;
pub mod variables;

pub use config::WorkbenchConfig;
pub use discovery::{
    discover_endpoints, discover_workspace, endpoint_at_cursor, scan_directory, scan_document,
    DiscoveryError, ScanReport,
};
pub use environment::{Environment, EnvironmentSession};
pub use models::{DiscoveredEndpoint, Framework, HttpMethod};
pub use variables::interpolate;
