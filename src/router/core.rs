//! Router core module - registry, dispatch and reverse routing.

use crate::config::RouterConfig;
use crate::controller::{ControllerCatalog, DeclaredUrl};
use crate::error::{Result, RouterError};
use crate::module::Module;
use crate::request::Request;
use crate::route::{Argument, MethodOverrides, MethodTable, Route, Verb};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything needed to register one route.
///
/// Only `name` and `controller` are required. Without a pattern the
/// controller's declared URL is used; without a method table the
/// controller's declared verbs are used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRegistration {
    pub name: String,
    pub controller: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub methods: Option<MethodOverrides>,
}

impl RouteRegistration {
    #[must_use]
    pub fn new(name: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controller: controller.into(),
            module: None,
            pattern: None,
            methods: None,
        }
    }

    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Override the controller's declared URL pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Replace the controller's declared verb table.
    #[must_use]
    pub fn methods(mut self, methods: MethodOverrides) -> Self {
        self.methods = Some(methods);
        self
    }
}

/// Result of resolving a request to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route
    pub route: Arc<Route>,
    /// Action bound to the request's verb
    pub action: String,
    /// Call arguments in the action's declared parameter order
    pub arguments: Vec<Argument>,
}

/// Ordered route registry.
///
/// Dispatch walks routes in registration order and the first match wins;
/// there is no specificity scoring, so catch-all routes belong last.
///
/// Registration needs `&mut self`. Once configured, a router is only read,
/// and can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Arc<Route>>,
    index: HashMap<String, usize>,
    controllers: ControllerCatalog,
    config: RouterConfig,
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new(controllers: ControllerCatalog, config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            index: HashMap::new(),
            controllers,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerCatalog {
        &self.controllers
    }

    /// Controllers can be added at any point before the routes that use them.
    pub fn controllers_mut(&mut self) -> &mut ControllerCatalog {
        &mut self.controllers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    /// Register a route.
    ///
    /// Registering a name that already exists replaces the old route in its
    /// original position.
    ///
    /// # Errors
    ///
    /// * [`RouterError::InvalidController`] for an unknown controller
    /// * [`RouterError::InvalidRoute`] for a public route without a pattern,
    ///   or a pattern that does not compile
    /// * [`RouterError::InvalidHandler`] for an action that cannot be bound
    pub fn add_route(&mut self, registration: RouteRegistration) -> Result<Arc<Route>> {
        let RouteRegistration {
            name,
            controller,
            module,
            pattern,
            methods,
        } = registration;

        let descriptor = self
            .controllers
            .get(&controller)
            .cloned()
            .ok_or(RouterError::InvalidController { controller })?;

        let pattern = pattern.filter(|p| !p.is_empty());
        let private = pattern.is_none() && descriptor.url == DeclaredUrl::Unreachable;
        let pattern = pattern
            .or_else(|| descriptor.url.pattern().map(str::to_string))
            .unwrap_or_default();
        if !private && pattern.is_empty() {
            return Err(RouterError::InvalidRoute {
                route: name,
                reason: format!(
                    "controller '{}' declares no url and none was given",
                    descriptor.type_name
                ),
            });
        }

        let overrides = methods.as_ref().unwrap_or(&descriptor.methods);
        let table = MethodTable::resolve(&self.config.default_action, overrides);
        let route = Arc::new(Route::new(
            &name,
            &descriptor,
            &pattern,
            &table,
            module.as_deref(),
            private,
        )?);

        match self.index.get(&name) {
            Some(&pos) => {
                debug!(route = %name, "Replacing previously registered route");
                self.routes[pos] = Arc::clone(&route);
            }
            None => {
                self.index.insert(name.clone(), self.routes.len());
                self.routes.push(Arc::clone(&route));
            }
        }

        info!(
            route = %name,
            controller = %descriptor.type_name,
            pattern = %pattern,
            private,
            "Route registered"
        );
        Ok(route)
    }

    /// Register one route per instantiable controller of `module`.
    ///
    /// Routes are named `module:path` and their pattern is the module prefix
    /// followed by the controller's declared URL. Controllers declared
    /// unreachable stay private. Returns the number of routes registered.
    ///
    /// # Errors
    ///
    /// Any error from [`add_route`](Self::add_route); routes registered
    /// before the failure are kept.
    pub fn read_module_routes(&mut self, module: &Module) -> Result<usize> {
        let mut registered = 0;
        for entry in &module.controllers {
            if !entry.instantiable {
                debug!(
                    module = %module.name,
                    controller = %entry.type_name,
                    "Skipping non-instantiable controller"
                );
                continue;
            }
            let declared = self
                .controllers
                .get(&entry.type_name)
                .ok_or_else(|| RouterError::InvalidController {
                    controller: entry.type_name.clone(),
                })?
                .url
                .clone();

            let mut registration = RouteRegistration::new(module.route_name(entry), &entry.type_name)
                .module(&module.name);
            if let DeclaredUrl::Pattern(p) = declared {
                registration = registration.pattern(format!("{}{}", module.url_prefix, p));
            }
            self.add_route(registration)?;
            registered += 1;
        }

        info!(module = %module.name, routes_count = registered, "Module routes loaded");
        Ok(registered)
    }

    /// Look up a route by name.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] if no route has that name.
    pub fn get_route(&self, name: &str) -> Result<&Arc<Route>> {
        self.index
            .get(name)
            .map(|&pos| &self.routes[pos])
            .ok_or_else(|| RouterError::RouteNotFound {
                route: name.to_string(),
            })
    }

    /// First route, in registration order, that handles `method` on `path`.
    #[must_use]
    pub fn get_route_for_path(&self, path: &str, method: &str) -> Option<Arc<Route>> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        let found = self.routes.iter().find(|r| r.matches(path, method)).cloned();

        let duration_us = match_start.elapsed().as_micros();
        match &found {
            Some(route) => debug!(
                method = %method,
                path = %path,
                route = %route.name(),
                route_pattern = %route.pattern(),
                duration_us,
                "Route matched"
            ),
            None => debug!(method = %method, path = %path, duration_us, "No route matched"),
        }
        found
    }

    #[must_use]
    pub fn get_route_for_request(&self, request: &Request) -> Option<Arc<Route>> {
        self.get_route_for_path(&request.path, request.method.as_str())
    }

    /// Resolve `request` to a route, its action and bound call arguments.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatch`] when no route handles the request.
    pub fn route(&self, request: &Arc<Request>) -> Result<RouteMatch> {
        let method = request.method.as_str();
        let Some(route) = self.get_route_for_request(request) else {
            warn!(method = %method, path = %request.path, "No route matched");
            return Err(RouterError::NoMatch {
                route: String::new(),
                path: request.path.clone(),
                method: method.to_ascii_lowercase(),
            });
        };
        let arguments = route.bind_arguments(&request.path, method, Some(request))?;
        let action = Verb::parse(method)
            .and_then(|verb| route.binding(verb))
            .map(|b| b.action.clone())
            .unwrap_or_default();

        info!(
            method = %method,
            path = %request.path,
            route = %route.name(),
            action = %action,
            "Request routed"
        );
        Ok(RouteMatch {
            route,
            action,
            arguments,
        })
    }

    /// Arguments for calling `name`'s action directly, e.g. to render a
    /// private route by name.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`], or [`RouterError::NoMatch`] if the
    /// verb has no action.
    pub fn bind_by_name(
        &self,
        name: &str,
        method: &str,
        params: &Map<String, Value>,
        request: Option<&Arc<Request>>,
    ) -> Result<Vec<Argument>> {
        self.get_route(name)?
            .bind_arguments_from_map(method, params, request)
    }

    /// Generate the URL of route `name`. With `absolute`, the configured
    /// `protocol://host[:port]` is prepended when a host is set.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`], plus anything
    /// [`Route::generate_url`] returns.
    pub fn generate<K, V>(&self, name: &str, params: &[(K, V)], absolute: bool) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = self
            .get_route(name)?
            .generate_url(params)
            .inspect_err(|e| warn!(route = %name, error = %e, "URL generation failed"))?;
        Ok(if absolute {
            self.config.absolute(&path)
        } else {
            path
        })
    }

    /// Client-side template of route `name`.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] or [`RouterError::PrivateRoute`].
    pub fn expose(&self, name: &str) -> Result<String> {
        self.get_route(name)?.expose()
    }

    /// Log the route table: a summary at info, one debug line per route in
    /// matching order.
    pub fn dump_routes(&self) {
        info!(routes_count = self.routes.len(), "Registered routes");
        for route in &self.routes {
            let verbs: Vec<String> = route
                .bindings()
                .filter_map(|(verb, b)| b.map(|b| format!("{verb}:{}", b.action)))
                .collect();
            debug!(
                route = %route.name(),
                pattern = %route.pattern(),
                controller = %route.controller(),
                module = route.module().unwrap_or(""),
                private = route.is_private(),
                verbs = ?verbs,
                "Route"
            );
        }
    }
}
