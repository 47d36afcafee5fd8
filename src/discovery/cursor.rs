//! Cursor-to-endpoint lookup.

use crate::models::DiscoveredEndpoint;

/// How far below an endpoint's line the cursor may be and still resolve to it.
pub const DEFAULT_CURSOR_PROXIMITY: usize = 10;

/// Finds the endpoint a cursor line belongs to.
///
/// Picks the endpoint with the largest `line` not after `cursor_line`, then
/// accepts it only if it lies within `proximity` lines. This is nearest
/// preceding, not nearest overall: an endpoint just below the cursor never
/// wins.
pub fn find_endpoint_near_line(
    endpoints: &[DiscoveredEndpoint],
    cursor_line: usize,
    proximity: usize,
) -> Option<&DiscoveredEndpoint> {
    let nearest = endpoints
        .iter()
        .filter(|ep| ep.line <= cursor_line)
        .fold(None::<&DiscoveredEndpoint>, |best, ep| match best {
            Some(b) if b.line >= ep.line => Some(b),
            _ => Some(ep),
        })?;

    (cursor_line - nearest.line <= proximity).then_some(nearest)
}
