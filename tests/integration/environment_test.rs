//! Environment session tests against the on-disk JSON store and `.env` files.

use super::Fixture;
use rest_workbench::config::WorkbenchConfig;
use rest_workbench::environment::{
    export_environment, import_environment, is_env_file, EnvironmentSession, JsonFileStore,
};
use rest_workbench::variables::{find_placeholders, interpolate, unresolved_placeholders};
use std::collections::HashMap;
use std::sync::Arc;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_environment_survives_reload() {
    let fixture = Fixture::new();
    let store_path = fixture.root().join("state/environments.json");

    let session = EnvironmentSession::new(Arc::new(JsonFileStore::new(&store_path))).unwrap();
    let dev = session
        .create("dev", vars(&[("BASE_URL", "http://localhost:3000")]))
        .unwrap();
    let prod = session
        .create("prod", vars(&[("BASE_URL", "https://api.example.com")]))
        .unwrap();
    session.set_active(&prod.id).unwrap();
    session.rename(&dev.id, "local").unwrap();

    let reloaded = EnvironmentSession::new(Arc::new(JsonFileStore::new(&store_path))).unwrap();
    let names: Vec<_> = reloaded.list().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["local", "prod"]);
    assert_eq!(reloaded.get_active().unwrap().id, prod.id);
    assert_eq!(
        reloaded.interpolate("{{BASE_URL}}/api", &HashMap::new()),
        "https://api.example.com/api"
    );
}

#[test]
fn test_workspace_env_files_feed_interpolation() {
    let fixture = Fixture::new();
    fixture.write(
        ".env.development",
        "# local development\nBASE_URL=\"http://localhost:8080\"\nTOKEN='dev token'\n",
    );
    fixture.write(".env.example", "BASE_URL=http://example\n");

    let session = EnvironmentSession::open(fixture.root(), &WorkbenchConfig::default()).unwrap();
    let envs = session.list();
    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].name, "Development (.env.development)");
    assert!(envs[0].source_file.is_some());

    session.set_active(&envs[0].id).unwrap();
    assert_eq!(
        session.interpolate("{{BASE_URL}}/me -H 'Authorization: ${TOKEN}'", &HashMap::new()),
        "http://localhost:8080/me -H 'Authorization: dev token'"
    );
}

#[test]
fn test_open_without_env_sync() {
    let fixture = Fixture::new();
    fixture.write(".env", "A=1\n");

    let config = WorkbenchConfig {
        sync_env_files: false,
        ..WorkbenchConfig::default()
    };
    let session = EnvironmentSession::open(fixture.root(), &config).unwrap();
    assert!(session.list().is_empty());
    assert!(is_env_file(&fixture.root().join(".env")));
}

#[test]
fn test_postman_import_then_export() {
    let session = EnvironmentSession::in_memory();
    let postman = r#"{
        "name": "Staging",
        "values": [
            {"key": "baseUrl", "value": "https://staging.example.com", "enabled": true},
            {"key": "debug", "value": "1", "enabled": false}
        ]
    }"#;

    let imported = session.import(postman).unwrap().unwrap();
    assert!(session.get_active().is_none());

    let exported = export_environment(&imported);
    let again = import_environment(&exported).unwrap();
    assert_eq!(again.name, "Staging");
    assert_eq!(again.variables, vars(&[("baseUrl", "https://staging.example.com")]));
}

#[test]
fn test_interpolation_properties() {
    let overrides = HashMap::new();
    let mut env = rest_workbench::environment::Environment::new("dev");
    env.set("BASE_URL", "http://x");

    assert_eq!(interpolate("{{BASE_URL}}/api", &overrides, Some(&env)), "http://x/api");
    assert_eq!(interpolate("{{FOO}}", &overrides, Some(&env)), "{{FOO}}");

    let overrides = vars(&[("BASE_URL", "http://override")]);
    assert_eq!(
        interpolate("{{BASE_URL}}/api", &overrides, Some(&env)),
        "http://override/api"
    );

    let template = "{{BASE_URL}}/{{ version }}/users/${id}";
    assert_eq!(find_placeholders(template), vec!["BASE_URL", "version", "id"]);
    assert_eq!(
        unresolved_placeholders(template, &HashMap::new(), Some(&env)),
        vec!["version", "id"]
    );
}
