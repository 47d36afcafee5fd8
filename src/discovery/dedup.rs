//! Endpoint deduplication.

use crate::models::DiscoveredEndpoint;
use std::collections::HashSet;

/// Keeps the first endpoint seen for each `(method, path, file)` key.
///
/// Survivors stay in first-seen order.
pub fn dedup_endpoints<I>(endpoints: I) -> Vec<DiscoveredEndpoint>
where
    I: IntoIterator<Item = DiscoveredEndpoint>,
{
    let endpoints: Vec<DiscoveredEndpoint> = endpoints.into_iter().collect();

    let mut seen = HashSet::new();
    let first_seen: Vec<bool> = endpoints.iter().map(|ep| seen.insert(ep.key())).collect();

    endpoints
        .into_iter()
        .zip(first_seen)
        .filter_map(|(ep, keep)| keep.then_some(ep))
        .collect()
}
