//! # CLI Module
//!
//! Command-line access to a route manifest, for checking what a manifest
//! registers and how it resolves without starting an application.
//!
//! ## Commands
//!
//! ```bash
//! # List routes in registration (and therefore matching) order
//! waymark --manifest routes.yaml routes
//!
//! # Resolve a request
//! waymark --manifest routes.yaml match -X DELETE /items/42
//!
//! # Reverse routing
//! waymark --manifest routes.yaml generate item id=7 slug=foo extra=bar --absolute
//! waymark --manifest routes.yaml expose item
//! ```
//!
//! Logging goes to stderr and is configured with the `WAYMARK_LOG_*`
//! variables (see [`crate::logging`]).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, parse_key_value, run_cli, Cli, Commands};
