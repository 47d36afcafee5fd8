//! Data models shared by discovery and the request layer.
//!
//! This module contains the HTTP verb set and the endpoint record produced by
//! the scanner.

pub mod endpoint;
pub mod method;

pub use endpoint::{DiscoveredEndpoint, Framework};
pub use method::HttpMethod;
