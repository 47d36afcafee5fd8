//! Built-in route patterns and their extractors.
//!
//! Every pattern targets a literal-path call or annotation on a single
//! declaration. Patterns are heuristics: anything built from variables,
//! string concatenation or nested routers is out of reach.

use super::file_routes::{route_path_for, HANDLER_EXPORT};
use super::registry::{Candidate, Detection, Extractor, FamilySpec, Rule};
use super::source::FileContext;
use super::walker::SourceKind;
use crate::models::{Framework, HttpMethod};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VERB_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(get|post|put|patch|delete|head|options)\b")
        .expect("Failed to compile verb regex")
});

/// Path literal inside mapping arguments: the leading positional value or a
/// `value =` / `path =` attribute, in any position.
static SPRING_PATH_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^\s*\{?\s*|\b(?:value|path)\s*=\s*\{?\s*)"([^"]*)""#)
        .expect("Failed to compile mapping path regex")
});

static SPRING_METHOD_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bRequestMethod\.(\w+)").expect("Failed to compile request method regex")
});

/// Verbs a Spring mapping annotation name can encode, checked in this order.
const SPRING_VERBS: [(&str, HttpMethod); 5] = [
    ("get", HttpMethod::GET),
    ("post", HttpMethod::POST),
    ("put", HttpMethod::PUT),
    ("patch", HttpMethod::PATCH),
    ("delete", HttpMethod::DELETE),
];

/// All built-in families in detection order.
pub fn builtin_families() -> Vec<FamilySpec> {
    vec![
        family(
            Framework::Express,
            SourceKind::Script,
            Detection::Signatures(&["express"]),
            vec![rule(
                r#"\b(?:app|router|server|api|routes?|[A-Za-z_$][\w$]*Router)\.(get|post|put|patch|delete|options|head|all)\s*\(\s*["'`]([^"'`]+)["'`]\s*,"#,
                verb_and_path,
            )],
        ),
        family(
            Framework::Fastify,
            SourceKind::Script,
            Detection::Signatures(&["fastify"]),
            vec![
                rule(
                    r#"\b(?:fastify|app|server|instance)\.(get|post|put|patch|delete|options|head)\s*\(\s*["'`]([^"'`]+)["'`]\s*,"#,
                    verb_and_path,
                ),
                rule(
                    r#"\.route\s*\(\s*\{\s*method\s*:\s*\[?\s*["'`](\w+)["'`][^}]*?\burl\s*:\s*["'`]([^"'`]+)["'`]"#,
                    verb_and_path,
                ),
            ],
        ),
        family(
            Framework::Hono,
            SourceKind::Script,
            Detection::Signatures(&["hono"]),
            vec![rule(
                r#"\b(?:app|hono|api|route|router)\.(get|post|put|patch|delete|options|head|all)\s*\(\s*["'`]([^"'`]+)["'`]\s*,"#,
                verb_and_path,
            )],
        ),
        family(
            Framework::Koa,
            SourceKind::Script,
            Detection::Signatures(&["koa"]),
            vec![rule(
                r#"\b(?:router|[A-Za-z_$][\w$]*Router)\.(get|post|put|patch|delete|options|head|all)\s*\(\s*["'`]([^"'`]+)["'`]\s*,"#,
                verb_and_path,
            )],
        ),
        family(
            Framework::NestJs,
            SourceKind::Script,
            Detection::Signatures(&["@nestjs"]),
            vec![rule(
                r#"@(Get|Post|Put|Patch|Delete|Options|Head|All|Controller)\s*\(\s*(?:["'`]([^"'`]*)["'`])?"#,
                nest_decorator,
            )],
        ),
        FamilySpec {
            framework: Framework::NextJs,
            kind: SourceKind::Script,
            detection: Detection::SignaturesOrRouteFile(&["next/server"]),
            rules: vec![Rule {
                pattern: Regex::clone(&HANDLER_EXPORT),
                extract: next_handler,
            }],
        },
        family(
            Framework::FastApi,
            SourceKind::Python,
            Detection::Signatures(&["FastAPI", "fastapi"]),
            vec![rule(
                r#"@\s*[A-Za-z_]\w*\.(get|post|put|patch|delete|options|head)\s*\(\s*(?:path\s*=\s*)?[rbu]?["']([^"']*)["']"#,
                verb_and_path,
            )],
        ),
        family(
            Framework::Flask,
            SourceKind::Python,
            Detection::Signatures(&["flask", "Flask"]),
            vec![rule(
                r#"@\s*[A-Za-z_]\w*\.(route|get|post|put|patch|delete)\s*\(\s*[rbu]?["']([^"']*)["'](?:[^)]*?\bmethods\s*=\s*[\[\(]\s*["'](\w+)["'])?"#,
                flask_route,
            )],
        ),
        family(
            Framework::Go,
            SourceKind::Go,
            Detection::Always,
            vec![
                rule(
                    r#"\.(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS|Get|Post|Put|Patch|Delete|Head|Options)\s*\(\s*"(/[^"]*)""#,
                    verb_and_path,
                ),
                rule(
                    r#"\.(?:HandleFunc|Handle)\s*\(\s*"([^"]+)"(?:[^\n]*?\.Methods\(\s*"(\w+)")?"#,
                    go_handler,
                ),
            ],
        ),
        family(
            Framework::Spring,
            SourceKind::Java,
            Detection::Signatures(&["springframework", "@RestController", "Mapping("]),
            vec![rule(
                r#"@(GetMapping|PostMapping|PutMapping|PatchMapping|DeleteMapping|RequestMapping)\b(?:\s*\(([^)]*)\))?"#,
                spring_mapping,
            )],
        ),
        family(
            Framework::Rust,
            SourceKind::Rust,
            Detection::Signatures(&["actix_web", "axum", "rocket"]),
            vec![
                rule(
                    r#"#\[\s*(?:[A-Za-z_]\w*::)*(?:get|post|put|patch|delete|head|options)\s*\(\s*"(?P<path>[^"]*)""#,
                    verb_from_text,
                ),
                rule(
                    r#"\.route\s*\(\s*"(?P<path>[^"]*)"\s*,\s*(?:[A-Za-z_]\w*::)*(?:get|post|put|patch|delete|head|options)\s*\("#,
                    verb_from_text,
                ),
                rule(
                    r#"web::resource\s*\(\s*"(?P<path>[^"]*)"\s*\)\s*\.route\s*\(\s*web::(?:get|post|put|patch|delete|head|options)\s*\("#,
                    verb_from_text,
                ),
            ],
        ),
        family(
            Framework::Laravel,
            SourceKind::Php,
            Detection::Signatures(&["Route::"]),
            vec![rule(
                r#"Route::(get|post|put|patch|delete|options)\s*\(\s*["']([^"']*)["']"#,
                verb_and_path,
            )],
        ),
    ]
}

fn family(
    framework: Framework,
    kind: SourceKind,
    detection: Detection,
    rules: Vec<Rule>,
) -> FamilySpec {
    FamilySpec {
        framework,
        kind,
        detection,
        rules,
    }
}

fn rule(pattern: &str, extract: Extractor) -> Rule {
    Rule::new(pattern, extract)
}

/// Group 1 is the verb, group 2 the path. Catch-alls like `all` are skipped.
fn verb_and_path(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let method = HttpMethod::from_str(caps.get(1)?.as_str())?;
    Some(Candidate::new(method, caps.get(2)?.as_str()))
}

/// NestJS method decorators. `@Controller` only sets a prefix and is skipped.
fn nest_decorator(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let name = caps.get(1)?.as_str();
    if name == "Controller" {
        return None;
    }

    let method = HttpMethod::from_str(name)?;
    let path = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some(Candidate::new(method, path))
}

/// Exported route handler; the path comes from the file's location.
fn next_handler(caps: &Captures<'_>, ctx: &FileContext<'_>) -> Option<Candidate> {
    let method = HttpMethod::from_str(caps.get(1)?.as_str())?;
    let path = route_path_for(ctx.path)?;
    Some(Candidate::new(method, path))
}

/// Precedence: first entry of `methods=[...]`, then the inline verb, then GET.
fn flask_route(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let path = caps.get(2)?.as_str();
    let method = caps
        .get(3)
        .and_then(|m| HttpMethod::from_str(m.as_str()))
        .or_else(|| caps.get(1).and_then(|m| HttpMethod::from_str(m.as_str())))
        .unwrap_or(HttpMethod::GET);

    Some(Candidate::new(method, path))
}

/// `HandleFunc` / `Handle`. The verb comes from a gorilla `.Methods("X")`
/// suffix or a Go 1.22 `"X /path"` pattern, defaulting to GET.
fn go_handler(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let pattern = caps.get(1)?.as_str().trim();

    let (inline, path) = match pattern.split_once(' ') {
        Some((verb, rest)) => match HttpMethod::from_str(verb) {
            Some(method) => {
                let rest = rest.trim_start();
                // Host-qualified patterns ("GET example.com/x") keep only the path
                let path = rest.find('/').map(|i| &rest[i..]).unwrap_or(rest);
                (Some(method), path)
            }
            None => (None, pattern),
        },
        None => (None, pattern),
    };

    let method = caps
        .get(2)
        .and_then(|m| HttpMethod::from_str(m.as_str()))
        .or(inline)
        .unwrap_or(HttpMethod::GET);

    Some(Candidate::new(method, path))
}

/// The annotation name encodes the verb; `@RequestMapping` falls back to an
/// explicit `RequestMethod.X`, then GET.
fn spring_mapping(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let annotation = caps.get(1)?.as_str().to_ascii_lowercase();
    let args = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let path = SPRING_PATH_ARG
        .captures(args)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    let method = SPRING_VERBS
        .iter()
        .find(|(name, _)| annotation.contains(name))
        .map(|(_, method)| *method)
        .or_else(|| {
            SPRING_METHOD_ARG
                .captures(args)
                .and_then(|c| HttpMethod::from_str(c.get(1)?.as_str()))
        })
        .unwrap_or(HttpMethod::GET);

    Some(Candidate::new(method, path))
}

/// Rust attribute and builder styles: the verb is whatever verb name appears
/// in the matched text once the path literal is removed, defaulting to GET.
fn verb_from_text(caps: &Captures<'_>, _: &FileContext<'_>) -> Option<Candidate> {
    let path = caps.name("path")?;
    let whole = caps.get(0)?;

    let start = path.start() - whole.start();
    let end = path.end() - whole.start();
    let text = whole.as_str();
    let without_path = format!("{}{}", &text[..start], &text[end..]);

    let method = VERB_WORD
        .captures(&without_path)
        .and_then(|c| c.get(1))
        .and_then(|m| HttpMethod::from_str(m.as_str()))
        .unwrap_or(HttpMethod::GET);

    Some(Candidate::new(method, path.as_str()))
}
