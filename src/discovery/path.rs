//! Route path normalization and parameter extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the four parameter syntaxes: `:id`, `{id}` / `{id:\d+}`,
/// `[id]` / `[...id]`, and `<id>` / `<int:id>`. A JS template interpolation
/// `${id}` is matched without a capture so it never yields a parameter.
static PARAM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\$\{[^}]*\}",
        r"|:([A-Za-z_][A-Za-z0-9_]*)",
        r"|\{([A-Za-z_][A-Za-z0-9_]*)[^}]*\}",
        r"|\[(?:\.\.\.)?([A-Za-z_][A-Za-z0-9_]*)\]",
        r"|<(?:[A-Za-z_][A-Za-z0-9_]*:)?([A-Za-z_][A-Za-z0-9_]*)>",
    ))
    .expect("Failed to compile path parameter regex")
});

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Normalizes a captured route literal.
///
/// Strips one level of symmetric quotes and roots the path at `/`.
///
/// # Examples
///
/// ```
/// use rest_workbench::discovery::path::normalize_path;
///
/// assert_eq!(normalize_path("'users/:id'"), "/users/:id");
/// assert_eq!(normalize_path("/health"), "/health");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = strip_symmetric_quotes(trimmed);

    if unquoted.starts_with('/') {
        unquoted.to_string()
    } else {
        format!("/{}", unquoted)
    }
}

fn strip_symmetric_quotes(s: &str) -> &str {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            &s[first.len_utf8()..s.len() - last.len_utf8()]
        }
        _ => s,
    }
}

/// Collects parameter names from a route template in order of appearance.
///
/// # Examples
///
/// ```
/// use rest_workbench::discovery::path::extract_params;
///
/// assert_eq!(extract_params("/users/:id/posts/:postId"), vec!["id", "postId"]);
/// assert_eq!(extract_params("/users/{id}"), vec!["id"]);
/// assert_eq!(extract_params("/users/<id>"), vec!["id"]);
/// ```
pub fn extract_params(path: &str) -> Vec<String> {
    PARAM_REGEX
        .captures_iter(path)
        .filter_map(|caps| {
            (1..=4)
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}
