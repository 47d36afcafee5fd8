//! REST Workbench command line entry point
//!
//! Exposes endpoint discovery, cursor lookup and interpolation for scripts
//! and for hosts that prefer spawning a process over linking the library.
//!
//! Results go to stdout as JSON. Logging goes to stderr and is controlled by
//! `RUST_LOG` (default `warn`).

use clap::{Parser, Subcommand};
use rest_workbench::config::load_config;
use rest_workbench::discovery::{discover_workspace, endpoint_at_cursor, DiscoveryError};
use rest_workbench::environment::{parse_env_file, Environment};
use rest_workbench::variables::interpolate;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "rest-workbench",
    about = "Discover HTTP endpoints and interpolate request templates",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Editor settings JSON holding a \"rest-workbench\" section"
    )]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Scan one or more workspace roots for endpoints")]
    Scan {
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<PathBuf>,

        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },

    #[command(about = "Print the endpoint a zero-based cursor line belongs to")]
    At {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "LINE")]
        line: usize,
    },

    #[command(about = "Interpolate {{name}} and ${name} placeholders")]
    Interpolate {
        #[arg(value_name = "TEXT")]
        text: String,

        #[arg(long, value_name = "PATH", help = "Use a .env file as the active environment")]
        env_file: Option<PathBuf>,

        #[arg(
            long = "var",
            value_name = "K=V",
            value_parser = parse_binding,
            help = "Override binding, may be repeated"
        )]
        vars: Vec<(String, String)>,
    },
}

fn parse_binding(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected K=V, got '{}'", raw))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("[rest-workbench] {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<(), String> {
    if let Some(path) = &args.settings {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings {}: {}", path.display(), e))?;
        let settings = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid settings JSON {}: {}", path.display(), e))?;
        load_config(Some(settings))?;
    }

    match args.command {
        Commands::Scan { roots, pretty } => {
            let roots: Vec<PathBuf> = roots
                .into_iter()
                .map(|root| fs::canonicalize(&root).unwrap_or(root))
                .collect();
            let report = tokio::task::spawn_blocking(move || discover_workspace(&roots))
                .await
                .map_err(|e| DiscoveryError::Aborted(e.to_string()))
                .and_then(|result| result)
                .map_err(|e| e.to_string())?;

            for (file, reason) in report.skipped() {
                log::debug!("Skipped {}: {}", file.display(), reason);
            }
            print_json(&report.endpoints, pretty)
        }

        Commands::At { file, line } => {
            let content = fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            let file = fs::canonicalize(&file).unwrap_or(file);
            print_json(&endpoint_at_cursor(&file, &content, line), true)
        }

        Commands::Interpolate {
            text,
            env_file,
            vars,
        } => {
            let active = match env_file {
                Some(path) => {
                    let content = fs::read_to_string(&path)
                        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
                    Some(Environment::with_variables(
                        path.display().to_string(),
                        parse_env_file(&content),
                    ))
                }
                None => None,
            };

            let overrides: HashMap<String, String> = vars.into_iter().collect();
            println!("{}", interpolate(&text, &overrides, active.as_ref()));
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("Failed to serialize output: {}", e))?;

    println!("{}", json);
    Ok(())
}
