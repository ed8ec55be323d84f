//! # Router Configuration
//!
//! Settings that shape registration and reverse routing rather than
//! matching.
//!
//! ## Environment Variables
//!
//! | Variable                 | Default  | Meaning                                  |
//! |--------------------------|----------|------------------------------------------|
//! | `WAYMARK_PROTOCOL`       | `http`   | scheme for absolute URLs                 |
//! | `WAYMARK_HOST`           | unset    | host for absolute URLs                   |
//! | `WAYMARK_PORT`           | unset    | port for absolute URLs                   |
//! | `WAYMARK_DEFAULT_ACTION` | `handle` | action every verb maps to unless told otherwise |
//!
//! Without a host, absolute URL generation falls back to plain paths.
//!
//! ## Usage
//!
//! ```rust
//! use waymark::config::RouterConfig;
//!
//! let config = RouterConfig {
//!     protocol: "https".into(),
//!     host: Some("example.com".into()),
//!     ..RouterConfig::default()
//! };
//! assert_eq!(config.absolute("/items/7"), "https://example.com/items/7");
//! ```

use serde::Deserialize;
use std::env;

pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_ACTION: &str = "handle";

/// Reverse-routing and registration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Scheme used for absolute URLs
    pub protocol: String,
    /// Host used for absolute URLs
    pub host: Option<String>,
    /// Port used for absolute URLs; omitted when it is the scheme default
    pub port: Option<u16>,
    /// Action bound to every verb a controller does not override
    pub default_action: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: None,
            port: None,
            default_action: DEFAULT_ACTION.to_string(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps a `WAYMARK_*` variable
    /// name to its value. Empty values count as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            protocol: var("WAYMARK_PROTOCOL").unwrap_or(defaults.protocol),
            host: var("WAYMARK_HOST"),
            port: var("WAYMARK_PORT").and_then(|p| p.parse().ok()),
            default_action: var("WAYMARK_DEFAULT_ACTION").unwrap_or(defaults.default_action),
        }
    }

    /// `protocol://host[:port]`, or `None` without a host.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let default_port = match self.protocol.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        Some(match self.port {
            Some(port) if Some(port) != default_port => {
                format!("{}://{}:{}", self.protocol, host, port)
            }
            _ => format!("{}://{}", self.protocol, host),
        })
    }

    /// Prefix `path` with [`base_url`](Self::base_url) when a host is set.
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        match self.base_url() {
            Some(base) => format!("{}/{}", base, path.trim_start_matches('/')),
            None => path.to_string(),
        }
    }
}
