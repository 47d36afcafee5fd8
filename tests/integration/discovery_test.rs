//! End-to-end endpoint discovery tests over real directory trees.

use super::{init_test_env, Fixture};
use rest_workbench::config::WorkbenchConfig;
use rest_workbench::discovery::{
    discover_endpoints, discover_workspace, endpoint_at_cursor, scan_directory, DiscoveryError,
    SkipReason,
};
use rest_workbench::models::{DiscoveredEndpoint, Framework, HttpMethod};
use serial_test::serial;
use std::path::PathBuf;

fn keys(endpoints: &[DiscoveredEndpoint]) -> Vec<(HttpMethod, String, PathBuf)> {
    endpoints
        .iter()
        .map(|e| (e.method, e.path.clone(), e.file.clone()))
        .collect()
}

/// One fixture per framework family, each expected to yield exactly one endpoint.
const FIXTURES: &[(&str, &str, HttpMethod, &str, Framework)] = &[
    (
        "server.js",
        "const app = require('express')(); app.get('/users/:id', show);",
        HttpMethod::GET,
        "/users/:id",
        Framework::Express,
    ),
    (
        "server.mjs",
        "const fastify = require('fastify')(); fastify.post('/items', create);",
        HttpMethod::POST,
        "/items",
        Framework::Fastify,
    ),
    (
        "index.ts",
        "import { Hono } from 'hono'; const app = new Hono(); app.put('/a/:id', h);",
        HttpMethod::PUT,
        "/a/:id",
        Framework::Hono,
    ),
    (
        "router.js",
        "const router = require('@koa/router')(); router.delete('/k/:id', h);",
        HttpMethod::DELETE,
        "/k/:id",
        Framework::Koa,
    ),
    (
        "cats.controller.ts",
        "import { Get } from '@nestjs/common'; class C { @Get('cats') findAll() {} }",
        HttpMethod::GET,
        "/cats",
        Framework::NestJs,
    ),
    (
        "app/api/health/route.ts",
        "export async function GET() { return Response.json({}) }",
        HttpMethod::GET,
        "/api/health",
        Framework::NextJs,
    ),
    (
        "main.py",
        "from fastapi import FastAPI\n@app.get('/items/{item_id}')\n",
        HttpMethod::GET,
        "/items/{item_id}",
        Framework::FastApi,
    ),
    (
        "app.py",
        "from flask import Flask\n@app.route('/login', methods=['POST'])\n",
        HttpMethod::POST,
        "/login",
        Framework::Flask,
    ),
    (
        "main.go",
        "package main; func main() { r.GET(\"/ping\", ping) }",
        HttpMethod::GET,
        "/ping",
        Framework::Go,
    ),
    (
        "OrderController.java",
        "@RestController class A { @PostMapping(\"/orders\") void c() {} }",
        HttpMethod::POST,
        "/orders",
        Framework::Spring,
    ),
    (
        "main.rs",
        "use axum::routing::get; let app = Router::new().route(\"/health\", get(health));",
        HttpMethod::GET,
        "/health",
        Framework::Rust,
    ),
    (
        "routes/web.php",
        "<?php Route::post('/users', [UserController::class, 'store']);",
        HttpMethod::POST,
        "/users",
        Framework::Laravel,
    ),
];

#[test]
fn test_every_family_single_fixture() {
    for (rel, content, method, path, framework) in FIXTURES {
        let fixture = Fixture::new();
        let file = fixture.write(rel, content);

        let report = scan_directory(fixture.root(), &WorkbenchConfig::default()).unwrap();
        assert_eq!(report.endpoints.len(), 1, "fixture {} yielded {:?}", rel, report.endpoints);

        let endpoint = &report.endpoints[0];
        assert_eq!(endpoint.method, *method, "fixture {}", rel);
        assert_eq!(endpoint.path, *path, "fixture {}", rel);
        assert_eq!(endpoint.framework, *framework, "fixture {}", rel);
        assert_eq!(endpoint.file, file);
    }
}

#[test]
fn test_ignored_directories_are_never_visited() {
    let fixture = Fixture::new();
    fixture.write("src/app.js", "const express = require('express');\napp.get('/real', h);\n");
    fixture.write(
        "node_modules/express/lib/router.js",
        "const express = 1;\napp.get('/vendored', h);\n",
    );
    fixture.write(".cache/routes.js", "const express = 1;\napp.get('/hidden', h);\n");
    fixture.write("build/server.go", "r.GET(\"/built\", h)\n");

    let report = scan_directory(fixture.root(), &WorkbenchConfig::default()).unwrap();

    let paths: Vec<_> = report.endpoints.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/real"]);
    assert_eq!(report.files.len(), 1);
    assert!(report.files[0].file().ends_with("src/app.js"));
}

#[test]
fn test_rescan_of_unchanged_tree_is_stable() {
    let fixture = Fixture::new();
    fixture.write(
        "server.js",
        "const express = require('express');\n\
         app.get('/a', h);\n\
         app.get('/a', other);\n\
         app.post('/b', h);\n",
    );
    fixture.write("app/api/orders/route.ts", "export function POST() {}\nexport function GET() {}\n");
    fixture.write("main.go", "r.GET(\"/g\", h)\nhttp.HandleFunc(\"/g\", h)\n");

    let config = WorkbenchConfig::default();
    let first = scan_directory(fixture.root(), &config).unwrap();
    let second = scan_directory(fixture.root(), &config).unwrap();

    assert_eq!(keys(&first.endpoints), keys(&second.endpoints));

    // Duplicates within one file collapse to the first occurrence
    let a: Vec<_> = first.endpoints.iter().filter(|e| e.path == "/a").collect();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].line, 1);

    let g: Vec<_> = first.endpoints.iter().filter(|e| e.path == "/g").collect();
    assert_eq!(g.len(), 1);
    assert_eq!(g[0].line, 0);

    // Next handlers found by both passes appear once each
    let orders: Vec<_> = first
        .endpoints
        .iter()
        .filter(|e| e.path == "/api/orders")
        .map(|e| e.method)
        .collect();
    assert_eq!(orders, vec![HttpMethod::POST, HttpMethod::GET]);
}

#[test]
fn test_unreadable_and_binary_files_are_recorded() {
    let fixture = Fixture::new();
    fixture.write("ok.go", "r.GET(\"/ok\", h)\n");
    let binary = fixture.root().join("blob.js");
    std::fs::write(&binary, [0xc3u8, 0x28, 0xa0, 0xa1]).unwrap();

    let report = scan_directory(fixture.root(), &WorkbenchConfig::default()).unwrap();
    assert_eq!(report.endpoints.len(), 1);

    let skipped: Vec<_> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, binary.as_path());
    assert_eq!(skipped[0].1, &SkipReason::NotUtf8);
}

#[test]
#[serial]
fn test_discover_workspace_merges_folders() {
    init_test_env();
    let api = Fixture::new();
    api.write("main.go", "r.GET(\"/api\", h)\n");
    let web = Fixture::new();
    web.write("server.js", "const express = require('express');\napp.get('/web', h);\n");

    let report =
        discover_workspace(&[api.root().to_path_buf(), web.root().to_path_buf()]).unwrap();
    let paths: Vec<_> = report.endpoints.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/api", "/web"]);
}

#[test]
#[serial]
fn test_discover_workspace_errors() {
    init_test_env();
    assert_eq!(discover_workspace(&[]).unwrap_err(), DiscoveryError::NoWorkspace);

    let fixture = Fixture::new();
    let missing = fixture.root().join("missing");
    assert_eq!(
        discover_workspace(&[missing.clone()]).unwrap_err(),
        DiscoveryError::InvalidRoot(missing)
    );
}

#[test]
#[serial]
fn test_discover_respects_global_config() {
    init_test_env();
    let fixture = Fixture::new();
    fixture.write("gen/main.go", "r.GET(\"/generated\", h)\n");
    fixture.write("main.go", "r.GET(\"/main\", h)\n");

    rest_workbench::config::update_config(|config| {
        config.extra_ignored_dirs = vec!["gen".to_string()];
    });
    let endpoints = discover_endpoints(fixture.root()).unwrap();
    rest_workbench::config::reset_config();

    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/main");
}

#[test]
#[serial]
fn test_endpoint_at_cursor_in_document() {
    init_test_env();
    let content = "from flask import Flask\n\
                   app = Flask(__name__)\n\
                   \n\
                   @app.route('/users/<int:user_id>', methods=['GET', 'DELETE'])\n\
                   def user(user_id):\n\
                   \x20   return {}\n";

    let endpoint = endpoint_at_cursor(&PathBuf::from("/proj/app.py"), content, 5).unwrap();
    assert_eq!(endpoint.path, "/users/<int:user_id>");
    assert_eq!(endpoint.line, 3);
    assert_eq!(endpoint.params, Some(vec!["user_id".to_string()]));

    assert!(endpoint_at_cursor(&PathBuf::from("/proj/app.py"), content, 2).is_none());
}

#[test]
fn test_endpoint_json_shape() {
    let fixture = Fixture::new();
    let file = fixture.write("app.js", "const express = require('express');\napp.get('/users/:id', h);\n");

    let report = scan_directory(fixture.root(), &WorkbenchConfig::default()).unwrap();
    let json = serde_json::to_value(&report.endpoints[0]).unwrap();

    assert_eq!(json["method"], "GET");
    assert_eq!(json["path"], "/users/:id");
    assert_eq!(json["file"], serde_json::json!(file));
    assert_eq!(json["line"], 1);
    assert_eq!(json["framework"], "express");
    assert_eq!(json["params"], serde_json::json!(["id"]));
}

#[cfg(feature = "async")]
#[tokio::test]
#[serial]
async fn test_discover_endpoints_async() {
    init_test_env();
    let fixture = Fixture::new();
    fixture.write("main.go", "r.PATCH(\"/async\", h)\n");

    let endpoints = rest_workbench::discovery::discover_endpoints_async(fixture.root().to_path_buf())
        .await
        .unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].method, HttpMethod::PATCH);
}
