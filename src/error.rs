use std::fmt;

/// Errors raised by route registration, dispatch and URL generation.
///
/// Every variant is returned synchronously to the caller; nothing inside the
/// router retries or recovers. Re-registering a route name is *not* an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The controller reference is not a known controller
    InvalidController {
        /// The controller type name that was referenced
        controller: String,
    },
    /// A public route has no usable URL pattern
    InvalidRoute {
        /// Route name being registered
        route: String,
        /// Why the pattern was rejected
        reason: String,
    },
    /// A declared action is missing, not public, or static
    InvalidHandler {
        /// Controller type name
        controller: String,
        /// Action name that failed to resolve
        action: String,
        /// Why the action was rejected
        reason: String,
    },
    /// Lookup by name failed
    RouteNotFound {
        /// The requested route name
        route: String,
    },
    /// The path does not satisfy the route at argument-binding time
    NoMatch {
        /// Route name (empty when no route was selected at all)
        route: String,
        /// The request path
        path: String,
        /// The request method
        method: String,
    },
    /// URL generation was given too few parameters
    MissingParameter {
        /// Route name
        route: String,
        /// The required placeholder with no value
        parameter: String,
    },
    /// `generate_url` / `expose` called on a private route
    PrivateRoute {
        /// Route name
        route: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidController { controller } => {
                write!(f, "'{controller}' is not a registered controller")
            }
            RouterError::InvalidRoute { route, reason } => {
                write!(f, "invalid route '{route}': {reason}")
            }
            RouterError::InvalidHandler {
                controller,
                action,
                reason,
            } => write!(f, "invalid handler {controller}::{action}: {reason}"),
            RouterError::RouteNotFound { route } => write!(f, "route '{route}' not found"),
            RouterError::NoMatch {
                route,
                path,
                method,
            } => {
                if route.is_empty() {
                    write!(f, "no route matches {method} {path}")
                } else if path.is_empty() {
                    write!(f, "route '{route}' has no action for {method}")
                } else {
                    write!(f, "route '{route}' does not match {method} {path}")
                }
            }
            RouterError::MissingParameter { route, parameter } => write!(
                f,
                "missing parameter '{parameter}' while generating url for route '{route}'"
            ),
            RouterError::PrivateRoute { route } => {
                write!(f, "route '{route}' is private and has no public url")
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Convenience alias for results carrying a [`RouterError`].
pub type Result<T> = std::result::Result<T, RouterError>;
