//! File-based routing (Next.js style).
//!
//! In file-based routers the route path comes from where a handler file sits,
//! not from anything written inside it. `app/api/users/[id]/route.ts` serves
//! `/api/users/[id]`; `pages/api/users/index.ts` serves `/api/users`.

use super::lines::LineIndex;
use super::path::extract_params;
use super::report::FileOutcome;
use super::source::read_source;
use super::walker::{SourceWalker, WalkOutcome, SCRIPT_EXTENSIONS};
use crate::models::{DiscoveredEndpoint, Framework, HttpMethod};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// API directory conventions walked by the file-based pass, relative to the root.
pub const API_DIRS: &[&str] = &["app/api", "src/app/api", "pages/api", "src/pages/api"];

/// `export function GET`, `export async function POST`, `export const PUT = ...`
pub(crate) static HANDLER_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"export\s+(?:(?:async\s+)?function\s*\*?|const|let|var)\s+(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\b",
    )
    .expect("Failed to compile handler export regex")
});

/// `req.method === 'POST'` or `case "DELETE":` inside a pages-router handler.
static METHOD_CHECK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:method\s*===?\s*|case\s+)["'](GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)["']"#,
    )
    .expect("Failed to compile method check regex")
});

static DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\b").expect("Failed to compile default export regex"));

/// Which file-based router a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterKind {
    /// `app/api/**/route.ts`
    App,
    /// `pages/api/**/*.ts`
    Pages,
}

/// Derives the served route path of a handler file, if it sits in an API
/// directory and follows the file naming convention.
///
/// # Examples
///
/// ```
/// use rest_workbench::discovery::file_routes::route_path_for;
/// use std::path::Path;
///
/// assert_eq!(
///     route_path_for(Path::new("/repo/src/app/api/users/[id]/route.ts")).as_deref(),
///     Some("/api/users/[id]")
/// );
/// assert_eq!(
///     route_path_for(Path::new("/repo/pages/api/users/index.js")).as_deref(),
///     Some("/api/users")
/// );
/// assert_eq!(route_path_for(Path::new("/repo/src/lib/db.ts")), None);
/// ```
pub fn route_path_for(file: &Path) -> Option<String> {
    route_location(file).map(|(_, path)| path)
}

fn route_location(file: &Path) -> Option<(RouterKind, String)> {
    let components: Vec<&str> = file
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;

    let file_name = Path::new(*components.last()?);
    let ext = file_name.extension()?.to_str()?.to_ascii_lowercase();
    if !SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let stem = file_name.file_stem()?.to_str()?;

    // The innermost app/api or pages/api wins; the file must sit below it
    let base = (0..components.len().saturating_sub(2))
        .rev()
        .find(|&i| matches!(components[i], "app" | "pages") && components[i + 1] == "api")?;

    let kind = if components[base] == "app" {
        RouterKind::App
    } else {
        RouterKind::Pages
    };

    let mut segments: Vec<&str> = components[base + 1..components.len() - 1].to_vec();
    match kind {
        RouterKind::App if stem != "route" => return None,
        RouterKind::App => {}
        RouterKind::Pages if stem.starts_with('_') => return None,
        RouterKind::Pages => segments.push(stem),
    }

    let mut path = format!("/{}", segments.join("/"));
    if let Some(collapsed) = path.strip_suffix("/index") {
        path = collapsed.to_string();
    }
    if path.is_empty() {
        path.push('/');
    }

    Some((kind, path))
}

/// Finds the verbs a handler file serves, each with the byte offset of its
/// first evidence, in [`HttpMethod::ALL`] order.
pub fn route_handlers(content: &str, kind: RouterKind) -> Vec<(HttpMethod, usize)> {
    let exported = first_offsets(&HANDLER_EXPORT, content);
    if !exported.is_empty() || kind == RouterKind::App {
        return exported;
    }

    let checked = first_offsets(&METHOD_CHECK, content);
    if !checked.is_empty() {
        return checked;
    }

    DEFAULT_EXPORT
        .find(content)
        .map(|m| vec![(HttpMethod::GET, m.start())])
        .unwrap_or_default()
}

fn first_offsets(pattern: &Regex, content: &str) -> Vec<(HttpMethod, usize)> {
    let mut offsets: HashMap<HttpMethod, usize> = HashMap::new();
    for caps in pattern.captures_iter(content) {
        if let (Some(whole), Some(verb)) = (caps.get(0), caps.get(1)) {
            if let Some(method) = HttpMethod::from_str(verb.as_str()) {
                offsets.entry(method).or_insert(whole.start());
            }
        }
    }

    HttpMethod::ALL
        .iter()
        .filter_map(|m| offsets.get(m).map(|offset| (*m, *offset)))
        .collect()
}

/// Endpoints served by one handler file, given its content.
pub fn scan_route_file(file: &Path, content: &str) -> Vec<DiscoveredEndpoint> {
    let (kind, path) = match route_location(file) {
        Some(location) => location,
        None => return Vec::new(),
    };

    let index = LineIndex::new(content);
    let params = extract_params(&path);
    let params = (!params.is_empty()).then_some(params);

    route_handlers(content, kind)
        .into_iter()
        .map(|(method, offset)| DiscoveredEndpoint {
            method,
            path: path.clone(),
            file: file.to_path_buf(),
            line: index.line_of(offset),
            framework: Framework::NextJs,
            params: params.clone(),
        })
        .collect()
}

/// Walks the API directory conventions under `root` and scans every handler file.
///
/// Returns per-file outcomes plus any walk errors, in the same shape as the
/// pattern pass.
pub fn scan_file_routes(
    root: &Path,
    walker: &SourceWalker,
    max_file_size: u64,
) -> (Vec<FileOutcome>, WalkOutcome) {
    let mut outcomes = Vec::new();
    let mut walked = WalkOutcome::default();

    for api_dir in API_DIRS {
        if api_dir.split('/').any(|component| walker.is_ignored_dir(component)) {
            debug!("Skipping file-based routes under ignored {}", api_dir);
            continue;
        }

        let dir = root.join(api_dir);
        if !dir.is_dir() {
            continue;
        }

        debug!("Scanning file-based routes under {}", dir.display());
        let mut listing = walker.walk_filtered(&dir, |path| route_path_for(path).is_some());

        for file in &listing.files {
            let outcome = match read_source(file, max_file_size) {
                Ok(content) => FileOutcome::Scanned {
                    file: file.clone(),
                    endpoints: scan_route_file(file, &content),
                },
                Err(reason) => {
                    warn!("Skipping route file {}: {}", file.display(), reason);
                    FileOutcome::Skipped {
                        file: file.clone(),
                        reason,
                    }
                }
            };
            outcomes.push(outcome);
        }

        walked.files.append(&mut listing.files);
        walked.errors.append(&mut listing.errors);
    }

    (outcomes, walked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_app_router_path() {
        assert_eq!(
            route_path_for(Path::new("/r/app/api/health/route.ts")).as_deref(),
            Some("/api/health")
        );
        assert_eq!(
            route_path_for(Path::new("/r/app/api/route.js")).as_deref(),
            Some("/api")
        );
    }

    #[test]
    fn test_app_router_requires_route_file() {
        assert_eq!(route_path_for(Path::new("/r/app/api/users/helpers.ts")), None);
        assert_eq!(route_path_for(Path::new("/r/app/api/users/route.test.ts")), None);
    }

    #[test]
    fn test_pages_router_path() {
        assert_eq!(
            route_path_for(Path::new("/r/src/pages/api/posts/[slug].ts")).as_deref(),
            Some("/api/posts/[slug]")
        );
        assert_eq!(
            route_path_for(Path::new("/r/pages/api/index.ts")).as_deref(),
            Some("/api")
        );
        assert_eq!(route_path_for(Path::new("/r/pages/api/_middleware.ts")), None);
    }

    #[test]
    fn test_non_script_files_ignored() {
        assert_eq!(route_path_for(Path::new("/r/pages/api/readme.md")), None);
        assert_eq!(route_path_for(Path::new("/r/pages/about.tsx")), None);
    }

    #[test]
    fn test_app_handlers_from_exports() {
        let content = "import { NextResponse } from 'next/server';\n\
                       export async function POST(req) {}\n\
                       export function GET() {}\n\
                       export const DELETE = handler;\n";

        let verbs: Vec<_> = route_handlers(content, RouterKind::App)
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(
            verbs,
            vec![HttpMethod::GET, HttpMethod::POST, HttpMethod::DELETE]
        );
    }

    #[test]
    fn test_app_without_exports_serves_nothing() {
        assert!(route_handlers("export default function x() {}", RouterKind::App).is_empty());
    }

    #[test]
    fn test_pages_handlers_from_method_checks() {
        let content = "export default function handler(req, res) {\n\
                       if (req.method === 'POST') {}\n\
                       switch (req.method) { case \"DELETE\": break; }\n}";

        let verbs: Vec<_> = route_handlers(content, RouterKind::Pages)
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        assert_eq!(verbs, vec![HttpMethod::POST, HttpMethod::DELETE]);
    }

    #[test]
    fn test_pages_default_export_falls_back_to_get() {
        let verbs = route_handlers(
            "export default function handler(req, res) { res.json({}) }",
            RouterKind::Pages,
        );
        assert_eq!(verbs, vec![(HttpMethod::GET, 0)]);
    }

    #[test]
    fn test_scan_route_file_lines_and_params() {
        let file = Path::new("/r/app/api/users/[id]/route.ts");
        let content = "import x from 'y';\n\nexport async function GET() {}\n";

        let endpoints = scan_route_file(file, content);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/api/users/[id]");
        assert_eq!(endpoints[0].line, 2);
        assert_eq!(endpoints[0].framework, Framework::NextJs);
        assert_eq!(endpoints[0].params, Some(vec!["id".to_string()]));
    }

    #[test]
    fn test_scan_file_routes_walks_conventions() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        let route = root.join("src/app/api/orders/route.ts");
        fs::create_dir_all(route.parent().unwrap()).unwrap();
        fs::write(&route, "export async function POST() {}\n").unwrap();

        let page = root.join("pages/api/ping.js");
        fs::create_dir_all(page.parent().unwrap()).unwrap();
        fs::write(&page, "export default (req, res) => res.end('pong')\n").unwrap();

        let stray = root.join("lib/route.ts");
        fs::create_dir_all(stray.parent().unwrap()).unwrap();
        fs::write(&stray, "export async function GET() {}\n").unwrap();

        let (outcomes, walked) = scan_file_routes(root, &SourceWalker::default(), 1024 * 1024);
        assert!(walked.errors.is_empty());

        let endpoints: Vec<_> = outcomes
            .iter()
            .flat_map(|o| o.endpoints().iter().map(|e| e.label()))
            .collect();
        assert_eq!(endpoints, vec!["POST /api/orders", "GET /api/ping"]);
    }

    #[test]
    fn test_scan_file_routes_respects_ignored_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        for rel in ["app/api/a/route.ts", "src/app/api/b/route.ts"] {
            let file = root.join(rel);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(&file, "export function GET() {}\n").unwrap();
        }

        let walker = SourceWalker::new(&["src".to_string()]);
        let (outcomes, walked) = scan_file_routes(root, &walker, 1024 * 1024);

        assert_eq!(walked.files, vec![root.join("app/api/a/route.ts")]);
        let endpoints: Vec<_> = outcomes
            .iter()
            .flat_map(|o| o.endpoints().iter().map(|e| e.label()))
            .collect();
        assert_eq!(endpoints, vec!["GET /api/a"]);
    }
}
