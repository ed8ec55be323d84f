//! # Router Module
//!
//! The router module keeps the ordered registry of [`Route`](crate::route::Route)s
//! and answers the three questions an application asks of it:
//!
//! - which route handles this request, and with which arguments
//! - what is the URL of the route with this name
//! - what client-side template does a route expose
//!
//! ## Architecture
//!
//! The router works in two phases:
//!
//! 1. **Configuration**: controllers are registered into a
//!    [`ControllerCatalog`](crate::controller::ControllerCatalog) and routes are
//!    added explicitly ([`Router::add_route`]) or per module
//!    ([`Router::read_module_routes`]). Each route compiles its pattern once.
//!
//! 2. **Dispatch**: for each request the router tests routes in registration
//!    order and returns the first one whose pattern matches the path and which
//!    binds an action to the request's verb.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waymark::config::RouterConfig;
//! use waymark::controller::{ActionDescriptor, ControllerCatalog, ControllerDescriptor, ParamDescriptor};
//! use waymark::request::Request;
//! use waymark::route::Verb;
//! use waymark::router::{RouteRegistration, Router};
//!
//! let mut catalog = ControllerCatalog::new();
//! catalog.insert(
//!     ControllerDescriptor::new("Items")
//!         .url("/items/{id:int}")
//!         .method(Verb::Get, "show")
//!         .disable(Verb::Delete)
//!         .action(ActionDescriptor::new("show").param(ParamDescriptor::new("id"))),
//! );
//!
//! let mut router = Router::new(catalog, RouterConfig::default());
//! router.add_route(RouteRegistration::new("items", "Items")).unwrap();
//!
//! let matched = router.route(&Arc::new(Request::get("/items/42"))).unwrap();
//! assert_eq!(matched.action, "show");
//! assert_eq!(matched.arguments[0].as_str(), Some("42"));
//! assert_eq!(router.generate("items", &[("id", "7")], false).unwrap(), "/items/7");
//! ```
//!
//! ## Performance
//!
//! Matching is a linear scan over compiled regexes: O(n) in the number of
//! routes. Order is part of the contract, so routes are never reordered.

mod core;

pub use self::core::{RouteMatch, RouteRegistration, Router};
