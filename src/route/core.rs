use super::binding::{Argument, MethodBinding, MethodTable, Verb};
use super::pattern::{ParamVec, Pattern};
use crate::controller::ControllerDescriptor;
use crate::error::{Result, RouterError};
use crate::request::Request;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// One named, compiled route.
///
/// Built once at registration time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    controller: String,
    pattern: Pattern,
    bindings: [Option<MethodBinding>; 4],
    module: Option<String>,
    private: bool,
}

impl Route {
    /// Compile the pattern and resolve one binding per reachable verb.
    ///
    /// # Errors
    ///
    /// * [`RouterError::InvalidRoute`] if the pattern does not compile
    /// * [`RouterError::InvalidHandler`] if an action cannot be bound
    pub fn new(
        name: &str,
        controller: &ControllerDescriptor,
        pattern: &str,
        methods: &MethodTable,
        module: Option<&str>,
        private: bool,
    ) -> Result<Self> {
        let compiled = Pattern::compile(pattern).map_err(|e| RouterError::InvalidRoute {
            route: name.to_string(),
            reason: format!("pattern '{pattern}' does not compile: {e}"),
        })?;

        let mut bindings: [Option<MethodBinding>; 4] = Default::default();
        for verb in Verb::ALL {
            if let Some(action) = methods.action(verb) {
                bindings[verb.index()] = Some(MethodBinding::resolve(
                    controller,
                    action,
                    methods.default_action(),
                )?);
            }
        }

        Ok(Self {
            name: name.to_string(),
            controller: controller.type_name.clone(),
            pattern: compiled,
            bindings,
            module: module.map(str::to_string),
            private,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controller type name.
    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// The raw URL pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.private
    }

    #[must_use]
    pub fn binding(&self, verb: Verb) -> Option<&MethodBinding> {
        self.bindings[verb.index()].as_ref()
    }

    /// Every verb with its binding, in table order.
    pub fn bindings(&self) -> impl Iterator<Item = (Verb, Option<&MethodBinding>)> {
        Verb::ALL.into_iter().map(|verb| (verb, self.binding(verb)))
    }

    fn binding_for(&self, method: &str) -> Option<&MethodBinding> {
        Verb::parse(method).and_then(|verb| self.binding(verb))
    }

    /// Whether this route handles `method` on `path`. Private routes never
    /// match.
    #[must_use]
    pub fn matches(&self, path: &str, method: &str) -> bool {
        !self.private && self.binding_for(method).is_some() && self.pattern.is_match(path)
    }

    /// Call arguments for the action bound to `method`, taken from the
    /// captures of `path` in the action's declared parameter order.
    ///
    /// Parameters declared as `Request` receive `request` when one is given.
    /// Missing captures fall back to the declared default, then `null`.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatch`] if the verb has no binding or the path does
    /// not satisfy the pattern.
    pub fn bind_arguments(
        &self,
        path: &str,
        method: &str,
        request: Option<&Arc<Request>>,
    ) -> Result<Vec<Argument>> {
        let no_match = || RouterError::NoMatch {
            route: self.name.clone(),
            path: path.to_string(),
            method: method.to_ascii_lowercase(),
        };
        let binding = self.binding_for(method).ok_or_else(no_match)?;
        let captures = self.pattern.captures(path).ok_or_else(no_match)?;

        debug!(
            route = %self.name,
            action = %binding.action,
            path_params = ?captures,
            "Binding arguments from path"
        );

        Ok(bind(binding, request, |name| {
            capture(&captures, name).map(|raw| Value::String(url_decode(raw).into_owned()))
        }))
    }

    /// Call arguments for the action bound to `method`, taken from an
    /// arbitrary parameter map. String values are url-decoded; other values
    /// pass through. Works on private routes.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatch`] if the verb has no binding.
    pub fn bind_arguments_from_map(
        &self,
        method: &str,
        params: &Map<String, Value>,
        request: Option<&Arc<Request>>,
    ) -> Result<Vec<Argument>> {
        let binding = self
            .binding_for(method)
            .ok_or_else(|| RouterError::NoMatch {
                route: self.name.clone(),
                path: String::new(),
                method: method.to_ascii_lowercase(),
            })?;

        Ok(bind(binding, request, |name| {
            params.get(name).map(|value| match value {
                Value::String(s) => Value::String(url_decode(s).into_owned()),
                other => other.clone(),
            })
        }))
    }

    /// Build the path for this route from `params`.
    ///
    /// Placeholders consume same-named parameters (percent-encoded so that
    /// the default segment class matches them again); optional
    /// placeholders without a value become empty. Afterwards `//?` collapses
    /// to `/` and all remaining `?` characters are dropped. Unused parameters
    /// are appended as a query string in their given order.
    ///
    /// # Errors
    ///
    /// * [`RouterError::PrivateRoute`] for private routes
    /// * [`RouterError::MissingParameter`] for a required placeholder with
    ///   no value
    pub fn generate_url<K, V>(&self, params: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if self.private {
            return Err(RouterError::PrivateRoute {
                route: self.name.clone(),
            });
        }

        let mut remaining: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();

        let filled = self.pattern.substitute(|ph| {
            if let Some(pos) = remaining.iter().position(|(k, _)| *k == &*ph.name) {
                let (_, value) = remaining.remove(pos);
                Ok(encode_segment(value))
            } else if ph.optional {
                Ok(String::new())
            } else {
                Err(RouterError::MissingParameter {
                    route: self.name.clone(),
                    parameter: ph.name.to_string(),
                })
            }
        })?;

        let mut url = filled.replace("//?", "/").replace('?', "");

        if !remaining.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(remaining)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    /// The pattern as a client-side template (`{id:int}` → `{id}`, markers
    /// removed).
    ///
    /// # Errors
    ///
    /// [`RouterError::PrivateRoute`] for private routes.
    pub fn expose(&self) -> Result<String> {
        if self.private {
            return Err(RouterError::PrivateRoute {
                route: self.name.clone(),
            });
        }
        Ok(self.pattern.template())
    }
}

fn bind<F>(binding: &MethodBinding, request: Option<&Arc<Request>>, mut lookup: F) -> Vec<Argument>
where
    F: FnMut(&str) -> Option<Value>,
{
    binding
        .parameters
        .iter()
        .map(|spec| {
            if spec.injects_request() {
                if let Some(req) = request {
                    return Argument::Request(Arc::clone(req));
                }
            }
            Argument::Value(lookup(&spec.name).unwrap_or_else(|| spec.fallback()))
        })
        .collect()
}

fn capture<'a>(captures: &'a ParamVec, name: &str) -> Option<&'a str> {
    captures
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

// `urlencoding` leaves `-_.~` as is; `~` is outside the segment class.
fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).replace('~', "%7E")
}

fn url_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
