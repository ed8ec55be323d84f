//! Application modules for bulk route discovery.
//!
//! Finding controller types on disk or in a namespace is the host
//! application's job; a [`Module`] only carries the result of that scan.

use serde::Deserialize;

/// A controller type found under a module's controllers directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerEntry {
    /// Controller type name, as registered in the catalog
    pub type_name: String,
    /// Path relative to the module's controllers root, e.g. `Admin/Users`
    pub path: String,
    /// Abstract or otherwise non-instantiable types are skipped
    #[serde(default = "instantiable_default")]
    pub instantiable: bool,
}

fn instantiable_default() -> bool {
    true
}

impl ControllerEntry {
    #[must_use]
    pub fn new(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            path: path.into(),
            instantiable: true,
        }
    }

    #[must_use]
    pub fn non_instantiable(mut self) -> Self {
        self.instantiable = false;
        self
    }
}

/// A named group of controllers sharing a URL prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub url_prefix: String,
    #[serde(default)]
    pub controllers: Vec<ControllerEntry>,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: url_prefix.into(),
            controllers: Vec::new(),
        }
    }

    #[must_use]
    pub fn controller(mut self, entry: ControllerEntry) -> Self {
        self.controllers.push(entry);
        self
    }

    /// Route name for a discovered controller: `module:relative/path`.
    #[must_use]
    pub fn route_name(&self, entry: &ControllerEntry) -> String {
        format!("{}:{}", self.name, entry.path)
    }
}
