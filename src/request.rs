//! Minimal request value consumed by the router.
//!
//! The router only needs a method and a path. Headers, query and body are
//! carried so that a request injected into an action's arguments is useful to
//! the handler that receives it.

use http::Method;
use serde_json::Value;
use std::collections::HashMap;

/// Declared parameter type that asks for the live request to be injected.
pub const REQUEST_TYPE: &str = "Request";

/// An incoming HTTP request as seen by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Raw query string (everything after the first `?`), if any
    pub query: Option<String>,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed JSON body (if present)
    pub body: Option<Value>,
}

impl Request {
    /// Build a request from a method and a URI such as `/items/42?full=1`.
    ///
    /// The query string is split off the path.
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (uri.to_string(), None),
        };
        Self {
            method,
            path,
            query,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Add a header; the name is stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Decoded query string parameters.
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
