use crate::manifest::load_manifest;
use crate::request::Request;
use crate::route::{Argument, Verb};
use crate::router::Router;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use http::Method;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line interface for waymark
///
/// Loads a route manifest and answers routing questions against it.
#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Inspect and exercise a waymark route manifest", long_about = None)]
pub struct Cli {
    /// Path to the route manifest (YAML)
    #[arg(short, long, global = true, default_value = "routes.yaml")]
    pub manifest: PathBuf,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List every route in registration order
    Routes,
    /// Resolve a request path to a route and its bound arguments
    Match {
        /// Request path, optionally with a query string
        path: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
    },
    /// Generate the URL of a named route
    Generate {
        /// Route name
        name: String,

        /// Parameters as key=value pairs, in order
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Prefix with the configured protocol, host and port
        #[arg(long, default_value_t = false)]
        absolute: bool,
    },
    /// Print the client-side template of a named route
    Expose {
        /// Route name
        name: String,
    },
}

/// Parse a `key=value` argument.
///
/// # Errors
///
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, or the routing
/// operation fails.
pub fn run_cli(cli: Cli) -> Result<()> {
    let router = load_manifest(&cli.manifest)?;
    let stdout = std::io::stdout();
    execute(&router, &cli.command, &mut stdout.lock())
}

/// Run `command` against `router`, writing results to `out`.
///
/// # Errors
///
/// Routing errors and write failures.
pub fn execute(router: &Router, command: &Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Routes => {
            for route in router.routes() {
                let verbs: Vec<String> = route
                    .bindings()
                    .map(|(verb, b)| match b {
                        Some(b) => format!("{verb}={}", b.action),
                        None => format!("{verb}=-"),
                    })
                    .collect();
                writeln!(
                    out,
                    "{}\t{}\t{}{}\t{}",
                    route.name(),
                    if route.is_private() { "<private>" } else { route.pattern() },
                    route.controller(),
                    route.module().map(|m| format!(" ({m})")).unwrap_or_default(),
                    verbs.join(" ")
                )?;
            }
        }
        Commands::Match { path, method } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|e| anyhow!("invalid method '{method}': {e}"))?;
            let request = Arc::new(Request::new(method, path));
            let matched = router.route(&request)?;
            writeln!(out, "route: {}", matched.route.name())?;
            writeln!(out, "action: {}", matched.action)?;
            let params = Verb::parse(request.method.as_str())
                .and_then(|verb| matched.route.binding(verb))
                .map(|b| b.parameters.as_slice())
                .unwrap_or_default();
            for (spec, arg) in params.iter().zip(&matched.arguments) {
                let rendered = match arg {
                    Argument::Value(v) => v.to_string(),
                    Argument::Request(r) => format!("<request {} {}>", r.method, r.path),
                };
                writeln!(out, "  {} = {}", spec.name, rendered)?;
            }
        }
        Commands::Generate {
            name,
            params,
            absolute,
        } => {
            writeln!(out, "{}", router.generate(name, params.as_slice(), *absolute)?)?;
        }
        Commands::Expose { name } => {
            writeln!(out, "{}", router.expose(name)?)?;
        }
    }
    Ok(())
}
