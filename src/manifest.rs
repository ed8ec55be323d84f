//! # Route Manifests
//!
//! A manifest declares a whole router in one YAML document: reverse-routing
//! settings, controller descriptors, modules to scan and explicit routes.
//!
//! ```yaml
//! router:
//!   protocol: https
//!   host: shop.example
//! controllers:
//!   - type_name: ItemController
//!     url: /items/{id:int}
//!     methods: { get: show, delete: false }
//!     actions:
//!       - name: show
//!         params: [{ name: id }]
//! modules:
//!   - name: admin
//!     url_prefix: /admin
//!     controllers:
//!       - { type_name: ItemController, path: Items }
//! routes:
//!   - name: item
//!     controller: ItemController
//! ```
//!
//! Modules are read before explicit routes, each in document order. A later
//! route with an existing name replaces the earlier one in place.

use crate::config::RouterConfig;
use crate::controller::{ControllerCatalog, ControllerDescriptor};
use crate::module::Module;
use crate::router::{RouteRegistration, Router};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Reverse-routing settings; defaults when absent
    pub router: Option<RouterConfig>,
    pub controllers: Vec<ControllerDescriptor>,
    pub modules: Vec<Module>,
    pub routes: Vec<RouteRegistration>,
}

impl Manifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or unknown fields.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("failed to parse route manifest")
    }

    /// Build a router. Without a `router:` section the configuration comes
    /// from the environment.
    ///
    /// # Errors
    ///
    /// The first registration error, with the offending module or route
    /// named in the context.
    pub fn build_router(&self) -> Result<Router> {
        let config = self.router.clone().unwrap_or_else(RouterConfig::from_env);
        let catalog: ControllerCatalog = self.controllers.iter().cloned().collect();
        let mut router = Router::new(catalog, config);

        for module in &self.modules {
            router
                .read_module_routes(module)
                .with_context(|| format!("failed to read routes of module '{}'", module.name))?;
        }
        for registration in &self.routes {
            router
                .add_route(registration.clone())
                .with_context(|| format!("failed to register route '{}'", registration.name))?;
        }

        info!(
            controllers = self.controllers.len(),
            modules = self.modules.len(),
            "Routing table loaded"
        );
        router.dump_routes();
        Ok(router)
    }
}

/// Load a manifest file and build its router.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or a route is invalid.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Router> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    Manifest::from_yaml(&content)?.build_router()
}
