//! # waymark
//!
//! **waymark** is a named-route registry for controller-based web applications:
//! it compiles URL patterns, dispatches requests to controller actions in
//! registration order, binds the action's call arguments, and generates URLs
//! back from route names.
//!
//! ## Architecture
//!
//! - **[`route`]** - Pattern compilation, verb bindings, argument binding and
//!   URL generation for a single route
//! - **[`router`]** - Ordered registry: registration, first-match dispatch and
//!   lookup by name
//! - **[`controller`]** - Static controller descriptors (declared URL, verb
//!   table, action parameter lists)
//! - **[`module`]** - Module descriptors whose controllers are registered in bulk
//! - **[`manifest`]** - YAML manifests describing a whole router
//! - **[`config`]** - Reverse-routing settings (protocol, host, port, default action)
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//! - **[`cli`]** - The `waymark` command-line tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router as router::Router
//!     participant Route as route::Route
//!     participant Pattern as route::Pattern
//!
//!     Caller->>Router: route(&request)
//!     loop registration order
//!         Router->>Route: matches(path, method)
//!         Route->>Route: private? verb bound?
//!         Route->>Pattern: is_match(path)
//!     end
//!     Router->>Route: bind_arguments(path, method, request)
//!     Route->>Pattern: captures(path)
//!     Route-->>Router: Vec<Argument> in declared order
//!     Router-->>Caller: RouteMatch { route, action, arguments }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use waymark::controller::{ActionDescriptor, ControllerCatalog, ControllerDescriptor, ParamDescriptor};
//! use waymark::{Router, RouteRegistration, RouterConfig};
//!
//! let catalog: ControllerCatalog = [ControllerDescriptor::new("Items")
//!     .url("/items/{id:int}")
//!     .action(ActionDescriptor::new("handle").param(ParamDescriptor::new("id")))]
//! .into_iter()
//! .collect();
//!
//! let mut router = Router::new(catalog, RouterConfig::default());
//! router.add_route(RouteRegistration::new("item", "Items")).unwrap();
//!
//! let route = router.get_route_for_path("/items/42", "GET").unwrap();
//! assert_eq!(route.name(), "item");
//! assert_eq!(router.generate("item", &[("id", "7")], false).unwrap(), "/items/7");
//! ```
//!
//! ## Concurrency
//!
//! Registration takes `&mut Router`. A configured router is read-only and
//! `Send + Sync`; share it behind an `Arc` for concurrent dispatch.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod module;
pub mod request;
pub mod route;
pub mod router;

pub use config::RouterConfig;
pub use controller::{Controller, ControllerCatalog, ControllerDescriptor};
pub use error::RouterError;
pub use manifest::{load_manifest, Manifest};
pub use request::Request;
pub use route::{Argument, Route, Verb};
pub use router::{RouteMatch, RouteRegistration, Router};
