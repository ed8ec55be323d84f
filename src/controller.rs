//! # Controller Descriptors
//!
//! A controller tells the router three things: the URL pattern it answers on
//! by default (or that it is reachable only by name), which action each HTTP
//! verb maps to, and the ordered parameter list of every action.
//!
//! Every controller also provides the router's default action (`handle`
//! unless configured otherwise). A controller that does not declare it gets a
//! public action of that name with no parameters.
//!
//! Rust types describe themselves through [`Controller::descriptor`]; the same
//! [`ControllerDescriptor`] can also be read from a YAML manifest, so a
//! router can be configured without compiling controllers in.
//!
//! ```rust
//! use waymark::controller::{ActionDescriptor, Controller, ControllerDescriptor, ParamDescriptor};
//! use waymark::route::Verb;
//!
//! struct ItemController;
//!
//! impl Controller for ItemController {
//!     fn descriptor() -> ControllerDescriptor {
//!         ControllerDescriptor::new("ItemController")
//!             .url("/items/{id:int}")
//!             .method(Verb::Get, "show")
//!             .disable(Verb::Delete)
//!             .action(ActionDescriptor::new("show").param(ParamDescriptor::new("id")))
//!     }
//! }
//! ```

use crate::route::{MethodOverrides, Verb};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Implemented by controller types that can be registered with a router.
pub trait Controller {
    /// Static description of the controller's routes and actions.
    fn descriptor() -> ControllerDescriptor;
}

/// The URL a controller declares for itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawUrl")]
pub enum DeclaredUrl {
    /// A URL pattern (may be empty)
    Pattern(String),
    /// Reachable only by name; routes built from it are private
    Unreachable,
}

impl Default for DeclaredUrl {
    fn default() -> Self {
        DeclaredUrl::Pattern(String::new())
    }
}

impl DeclaredUrl {
    /// The declared pattern, `None` for the unreachable sentinel.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            DeclaredUrl::Pattern(p) => Some(p),
            DeclaredUrl::Unreachable => None,
        }
    }
}

// `url: false` is the unreachable sentinel.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUrl {
    Flag(bool),
    Pattern(String),
}

impl From<RawUrl> for DeclaredUrl {
    fn from(raw: RawUrl) -> Self {
        match raw {
            RawUrl::Flag(false) => DeclaredUrl::Unreachable,
            RawUrl::Flag(true) => DeclaredUrl::default(),
            RawUrl::Pattern(p) => DeclaredUrl::Pattern(p),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A declared action parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDescriptor {
    pub name: String,
    /// Declared type name; `Request` injects the live request
    #[serde(default, rename = "type")]
    pub declared_type: Option<String>,
    /// Default value. An explicit `null` is a default of `null`.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ParamDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
        }
    }

    /// A parameter that receives the live request.
    #[must_use]
    pub fn request(name: impl Into<String>) -> Self {
        Self::new(name).declared_type(crate::request::REQUEST_TYPE)
    }

    #[must_use]
    pub fn declared_type(mut self, ty: impl Into<String>) -> Self {
        self.declared_type = Some(ty.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A declared controller action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl ActionDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn set_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Everything the router needs to know about a controller type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerDescriptor {
    pub type_name: String,
    #[serde(default)]
    pub url: DeclaredUrl,
    #[serde(default)]
    pub methods: MethodOverrides,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            url: DeclaredUrl::default(),
            methods: MethodOverrides::default(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn url(mut self, pattern: impl Into<String>) -> Self {
        self.url = DeclaredUrl::Pattern(pattern.into());
        self
    }

    /// Mark the controller reachable only by name.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.url = DeclaredUrl::Unreachable;
        self
    }

    #[must_use]
    pub fn method(mut self, verb: Verb, action: impl Into<String>) -> Self {
        self.methods = self.methods.action(verb, action);
        self
    }

    #[must_use]
    pub fn disable(mut self, verb: Verb) -> Self {
        self.methods = self.methods.disable(verb);
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }
}

/// Known controllers, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ControllerCatalog {
    controllers: HashMap<String, Arc<ControllerDescriptor>>,
}

impl ControllerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Rust controller type.
    pub fn register<C: Controller>(&mut self) -> &mut Self {
        self.insert(C::descriptor())
    }

    /// Register a descriptor directly; a later descriptor with the same
    /// type name replaces the earlier one.
    pub fn insert(&mut self, descriptor: ControllerDescriptor) -> &mut Self {
        self.controllers
            .insert(descriptor.type_name.clone(), Arc::new(descriptor));
        self
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&Arc<ControllerDescriptor>> {
        self.controllers.get(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl FromIterator<ControllerDescriptor> for ControllerCatalog {
    fn from_iter<I: IntoIterator<Item = ControllerDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}
