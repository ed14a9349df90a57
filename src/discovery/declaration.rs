//! Declarative routing metadata.
//!
//! A handler type carries at most one [`ControllerRoute`] (class level) and,
//! per action, any number of [`RouteAttribute`]s (method level).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::routing::normalize;

/// Methods a method-level declaration accepts when none are given.
pub const DEFAULT_METHODS: [&str; 2] = ["GET", "POST"];

/// Class-level declaration: path prefix and default format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRoute {
    path: String,
    format: Option<String>,
}

impl ControllerRoute {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize(path),
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

impl Default for ControllerRoute {
    fn default() -> Self {
        Self::new("")
    }
}

/// Parameter names given to a where-option: one name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    One(String),
    Many(Vec<String>),
}

impl OptionValue {
    /// Names in the order they are passed to the constraint.
    pub fn names(&self) -> &[String] {
        match self {
            OptionValue::One(name) => std::slice::from_ref(name),
            OptionValue::Many(names) => names,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(name: &str) -> Self {
        OptionValue::One(name.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(name: String) -> Self {
        OptionValue::One(name)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(names: Vec<String>) -> Self {
        OptionValue::Many(names)
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(names: [&str; N]) -> Self {
        OptionValue::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

/// Method-level declaration. Repeatable on one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttribute {
    path: String,
    name: String,
    methods: Vec<String>,
    options: IndexMap<String, OptionValue>,
    format: Option<String>,
}

impl RouteAttribute {
    pub fn new(path: &str, name: impl Into<String>) -> Self {
        Self {
            path: normalize(path),
            name: name.into(),
            methods: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
            options: IndexMap::new(),
            format: None,
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Add a where-option such as `("whereNumber", "id")`. Later options run after earlier ones.
    ///
    /// Keys are checked when the declaration is realized, not here.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: IndexMap<String, OptionValue>) -> Self {
        self.options = options;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn options(&self) -> &IndexMap<String, OptionValue> {
        &self.options
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

/// Declarations attached to one action of a handler type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMetadata {
    pub name: String,
    pub routes: Vec<RouteAttribute>,
}

/// Everything declared on one handler type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMetadata {
    id: String,
    controllers: Vec<ControllerRoute>,
    actions: Vec<ActionMetadata>,
}

impl HandlerMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            controllers: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn controller(mut self, controller: ControllerRoute) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn action(mut self, name: impl Into<String>, routes: Vec<RouteAttribute>) -> Self {
        self.actions.push(ActionMetadata {
            name: name.into(),
            routes,
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn controllers(&self) -> &[ControllerRoute] {
        &self.controllers
    }

    pub fn actions(&self) -> &[ActionMetadata] {
        &self.actions
    }

    /// The class-level declaration in effect: the first one, or an empty prefix.
    pub fn controller_route(&self) -> ControllerRoute {
        self.controllers.first().cloned().unwrap_or_default()
    }
}
