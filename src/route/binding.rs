use crate::controller::{ControllerDescriptor, Visibility};
use crate::error::{Result, RouterError};
use crate::request::{Request, REQUEST_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The four HTTP verbs a route can bind an action to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// All verbs in table order.
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    /// Parse a method name case-insensitively. Anything else is `None`.
    #[must_use]
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "delete" => Some(Verb::Delete),
            _ => None,
        }
    }

    /// Lowercase verb name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Verb::Get => 0,
            Verb::Post => 1,
            Verb::Put => 2,
            Verb::Delete => 3,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a declared verb table.
///
/// In YAML an entry is either an action name, `false` (unreachable) or
/// `true` (the router's default action).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntry")]
pub enum MethodEntry {
    /// Use the router's default action name
    Default,
    /// Bind to a named action
    Action(String),
    /// The verb is not reachable
    Disabled,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Flag(bool),
    Action(String),
}

impl From<RawEntry> for MethodEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Flag(true) => MethodEntry::Default,
            RawEntry::Flag(false) => MethodEntry::Disabled,
            RawEntry::Action(name) => MethodEntry::Action(name),
        }
    }
}

/// A partial verb table. Verbs left unset fall back to the default action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodOverrides {
    pub get: Option<MethodEntry>,
    pub post: Option<MethodEntry>,
    pub put: Option<MethodEntry>,
    pub delete: Option<MethodEntry>,
}

impl MethodOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `verb` to `action`.
    #[must_use]
    pub fn action(mut self, verb: Verb, action: impl Into<String>) -> Self {
        *self.slot(verb) = Some(MethodEntry::Action(action.into()));
        self
    }

    /// Make `verb` unreachable.
    #[must_use]
    pub fn disable(mut self, verb: Verb) -> Self {
        *self.slot(verb) = Some(MethodEntry::Disabled);
        self
    }

    #[must_use]
    pub fn entry(&self, verb: Verb) -> Option<&MethodEntry> {
        match verb {
            Verb::Get => self.get.as_ref(),
            Verb::Post => self.post.as_ref(),
            Verb::Put => self.put.as_ref(),
            Verb::Delete => self.delete.as_ref(),
        }
    }

    fn slot(&mut self, verb: Verb) -> &mut Option<MethodEntry> {
        match verb {
            Verb::Get => &mut self.get,
            Verb::Post => &mut self.post,
            Verb::Put => &mut self.put,
            Verb::Delete => &mut self.delete,
        }
    }
}

/// A fully resolved verb → action table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTable {
    default_action: String,
    actions: [Option<String>; 4],
}

impl MethodTable {
    /// Every verb bound to `default_action`.
    #[must_use]
    pub fn uniform(default_action: &str) -> Self {
        Self {
            default_action: default_action.to_string(),
            actions: std::array::from_fn(|_| Some(default_action.to_string())),
        }
    }

    /// Merge `overrides` onto the uniform base table.
    #[must_use]
    pub fn resolve(default_action: &str, overrides: &MethodOverrides) -> Self {
        let mut table = Self::uniform(default_action);
        for verb in Verb::ALL {
            match overrides.entry(verb) {
                None | Some(MethodEntry::Default) => {}
                Some(MethodEntry::Action(name)) => table.actions[verb.index()] = Some(name.clone()),
                Some(MethodEntry::Disabled) => table.actions[verb.index()] = None,
            }
        }
        table
    }

    #[must_use]
    pub fn action(&self, verb: Verb) -> Option<&str> {
        self.actions[verb.index()].as_deref()
    }

    /// The generic action every controller provides.
    #[must_use]
    pub fn default_action(&self) -> &str {
        &self.default_action
    }
}

/// One declared parameter of an action, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub declared_type: Option<String>,
    pub default: Option<Value>,
}

impl ParamSpec {
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether this parameter receives the live request instead of a value.
    #[must_use]
    pub fn injects_request(&self) -> bool {
        self.declared_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(REQUEST_TYPE))
    }

    pub(crate) fn fallback(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

/// The action bound to one verb plus its parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBinding {
    pub action: String,
    pub parameters: Vec<ParamSpec>,
}

impl MethodBinding {
    /// Resolve `action` on the controller.
    ///
    /// `default_action` is part of every controller: when the controller
    /// does not declare it, it binds as a public action without parameters.
    /// A declaration, if present, is checked like any other action.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidHandler`] when the action is missing, not
    /// public, or static.
    pub fn resolve(
        controller: &ControllerDescriptor,
        action: &str,
        default_action: &str,
    ) -> Result<Self> {
        let invalid = |reason: &str| RouterError::InvalidHandler {
            controller: controller.type_name.clone(),
            action: action.to_string(),
            reason: reason.to_string(),
        };

        let Some(descriptor) = controller.actions.iter().find(|a| a.name == action) else {
            if action == default_action {
                return Ok(Self {
                    action: action.to_string(),
                    parameters: Vec::new(),
                });
            }
            return Err(invalid("action is not declared"));
        };
        if descriptor.visibility != Visibility::Public {
            return Err(invalid("action is not public"));
        }
        if descriptor.is_static {
            return Err(invalid("action is static"));
        }

        Ok(Self {
            action: descriptor.name.clone(),
            parameters: descriptor
                .params
                .iter()
                .map(|p| ParamSpec {
                    name: p.name.clone(),
                    declared_type: p.declared_type.clone(),
                    default: p.default.clone(),
                })
                .collect(),
        })
    }
}

/// A single bound call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A value taken from the path, a parameter map, or a default
    Value(Value),
    /// The live request
    Request(Arc<Request>),
}

impl Argument {
    /// The argument as a string, if it is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(v) => Some(v),
            Argument::Request(_) => None,
        }
    }

    #[must_use]
    pub fn as_request(&self) -> Option<&Arc<Request>> {
        match self {
            Argument::Request(r) => Some(r),
            Argument::Value(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ActionDescriptor, ParamDescriptor};

    fn controller() -> ControllerDescriptor {
        ControllerDescriptor::new("Items")
            .action(
                ActionDescriptor::new("show")
                    .param(ParamDescriptor::new("id"))
                    .param(ParamDescriptor::new("format").default_value("html")),
            )
            .action(ActionDescriptor::new("helper").visibility(Visibility::Protected))
            .action(ActionDescriptor::new("build").set_static())
    }

    #[test]
    fn test_verb_parse_is_case_insensitive() {
        assert_eq!(Verb::parse("GET"), Some(Verb::Get));
        assert_eq!(Verb::parse("Delete"), Some(Verb::Delete));
        assert_eq!(Verb::parse("patch"), None);
    }

    #[test]
    fn test_resolve_copies_parameters_in_order() {
        let binding = MethodBinding::resolve(&controller(), "show", "handle").unwrap();
        let names: Vec<_> = binding.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id", "format"]);
        assert!(!binding.parameters[0].has_default());
        assert_eq!(binding.parameters[1].default, Some(Value::from("html")));
    }

    #[test]
    fn test_resolve_rejects_missing_protected_and_static_actions() {
        for action in ["missing", "helper", "build"] {
            let err = MethodBinding::resolve(&controller(), action, "handle").unwrap_err();
            assert!(
                matches!(&err, RouterError::InvalidHandler { action: a, .. } if a == action),
                "unexpected error for {action}: {err:?}"
            );
        }
    }

    #[test]
    fn test_undeclared_default_action_binds_without_parameters() {
        let binding = MethodBinding::resolve(&controller(), "handle", "handle").unwrap();
        assert_eq!(binding.action, "handle");
        assert!(binding.parameters.is_empty());

        let err = MethodBinding::resolve(&controller(), "handle", "index").unwrap_err();
        assert!(matches!(err, RouterError::InvalidHandler { .. }));
    }

    #[test]
    fn test_declared_default_action_is_still_checked() {
        let err = MethodBinding::resolve(&controller(), "helper", "helper").unwrap_err();
        assert!(matches!(err, RouterError::InvalidHandler { .. }));
    }

    #[test]
    fn test_method_table_merges_overrides_onto_default() {
        let overrides = MethodOverrides::new()
            .action(Verb::Get, "show")
            .disable(Verb::Delete);
        let table = MethodTable::resolve("handle", &overrides);
        assert_eq!(table.action(Verb::Get), Some("show"));
        assert_eq!(table.action(Verb::Post), Some("handle"));
        assert_eq!(table.action(Verb::Put), Some("handle"));
        assert_eq!(table.action(Verb::Delete), None);
    }

    #[test]
    fn test_method_entries_from_yaml() {
        let overrides: MethodOverrides =
            serde_yaml::from_str("get: show\npost: true\ndelete: false\n").unwrap();
        assert_eq!(overrides.get, Some(MethodEntry::Action("show".into())));
        assert_eq!(overrides.post, Some(MethodEntry::Default));
        assert_eq!(overrides.put, None);
        assert_eq!(overrides.delete, Some(MethodEntry::Disabled));
    }

    #[test]
    fn test_request_type_marker() {
        let spec = ParamSpec {
            name: "req".into(),
            declared_type: Some("request".into()),
            default: None,
        };
        assert!(spec.injects_request());
        assert_eq!(spec.fallback(), Value::Null);
    }
}
