//! The route entity.
//!
//! # Responsibilities
//! - Hold route identity: name, path template, handler, methods, format
//! - Carry per-parameter constraints, set through builder calls
//! - Match a concrete path and extract named attributes
//!
//! # Design Decisions
//! - `matches` returns the extracted attributes instead of storing them on
//!   the route, so a route can be shared across threads without locking
//! - Shape mismatch and constraint violation both report "no match"
//! - The template is recompiled per call: constraints may rewrite it

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::observability::metrics;
use crate::routing::constraint::{Constraint, ConstraintSet};
use crate::routing::path::{normalize, PathTemplate, Placeholder};

const GET: &str = "GET";
const HEAD: &str = "HEAD";

/// Opaque reference to the code serving a route.
///
/// Mirrors a `(handler type, method)` pair; `action` is `None` for handlers
/// invoked directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handler {
    pub controller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Handler {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: Some(action.into()),
        }
    }

    pub fn invokable(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: None,
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{}::{}", self.controller, action),
            None => write!(f, "{}", self.controller),
        }
    }
}

/// Attributes extracted by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    attributes: IndexMap<String, String>,
}

impl RouteMatch {
    /// Attribute values keyed by placeholder name, in template order.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn into_attributes(self) -> IndexMap<String, String> {
        self.attributes
    }
}

/// A named, parameterized route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    name: String,
    path: PathTemplate,
    handler: Handler,
    methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "ConstraintSet::is_empty")]
    constraints: ConstraintSet,
}

impl Route {
    /// Create a route.
    ///
    /// Methods are upper-cased and de-duplicated; `HEAD` is added when `GET`
    /// is present. An empty method set is rejected.
    pub fn new<I, S>(
        name: impl Into<String>,
        path: &str,
        handler: Handler,
        methods: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let methods = normalize_methods(methods);
        if methods.is_empty() {
            return Err(RouteError::EmptyMethods { route: name });
        }
        Ok(Self {
            name,
            path: PathTemplate::new(path),
            handler,
            methods,
            format: None,
            constraints: ConstraintSet::new(),
        })
    }

    fn with_method(name: impl Into<String>, path: &str, handler: Handler, method: &str) -> Self {
        Self {
            name: name.into(),
            path: PathTemplate::new(path),
            handler,
            methods: normalize_methods([method]),
            format: None,
            constraints: ConstraintSet::new(),
        }
    }

    /// A `GET` (and `HEAD`) route.
    pub fn get(name: impl Into<String>, path: &str, handler: Handler) -> Self {
        Self::with_method(name, path, handler, GET)
    }

    pub fn post(name: impl Into<String>, path: &str, handler: Handler) -> Self {
        Self::with_method(name, path, handler, "POST")
    }

    pub fn put(name: impl Into<String>, path: &str, handler: Handler) -> Self {
        Self::with_method(name, path, handler, "PUT")
    }

    pub fn patch(name: impl Into<String>, path: &str, handler: Handler) -> Self {
        Self::with_method(name, path, handler, "PATCH")
    }

    pub fn delete(name: impl Into<String>, path: &str, handler: Handler) -> Self {
        Self::with_method(name, path, handler, "DELETE")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized path template.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Distinct placeholders declared by the template.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.path.placeholders()
    }

    /// True when the template declares at least one placeholder.
    pub fn has_attributes(&self) -> bool {
        !self.path.placeholders().is_empty()
    }

    pub fn allows_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.set_format(Some(format.into()));
        self
    }

    pub fn set_format(&mut self, format: Option<String>) {
        self.format = format;
    }

    /// Constrain `parameter` with a raw regex body, replacing any previous one.
    pub fn where_matches(mut self, parameter: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.constraints.insert(parameter, pattern);
        self
    }

    /// Apply a named constraint to each parameter.
    ///
    /// Segment-spanning constraints also rewrite `{name}` into `{name*}`.
    pub fn apply_constraint<I, S>(&mut self, constraint: Constraint, parameters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for parameter in parameters {
            let parameter = parameter.into();
            if constraint.spans_segments() {
                self.path.make_greedy(&parameter);
            }
            self.constraints.insert(parameter, constraint.pattern());
        }
    }

    pub fn where_number<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Number, parameters);
        self
    }

    pub fn where_slug<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Slug, parameters);
        self
    }

    pub fn where_alpha_numeric<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        parameters: I,
    ) -> Self {
        self.apply_constraint(Constraint::AlphaNumeric, parameters);
        self
    }

    pub fn where_alpha<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Alpha, parameters);
        self
    }

    /// Values of exactly two `/`-joined segments.
    pub fn where_two_segments<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        parameters: I,
    ) -> Self {
        self.apply_constraint(Constraint::TwoSegments, parameters);
        self
    }

    /// Catch-all value, slashes included. Takes a single parameter.
    pub fn where_anything(mut self, parameter: impl Into<String>) -> Self {
        self.apply_constraint(Constraint::Anything, [parameter]);
        self
    }

    pub fn where_date<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Date, parameters);
        self
    }

    pub fn where_year_month<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        parameters: I,
    ) -> Self {
        self.apply_constraint(Constraint::YearMonth, parameters);
        self
    }

    pub fn where_email<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Email, parameters);
        self
    }

    pub fn where_uuid<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Uuid, parameters);
        self
    }

    pub fn where_bool<I: IntoIterator<Item = S>, S: Into<String>>(mut self, parameters: I) -> Self {
        self.apply_constraint(Constraint::Bool, parameters);
        self
    }

    /// Check that the template and every constraint compile.
    pub fn validate(&self) -> Result<()> {
        self.path
            .compile()
            .map_err(|source| RouteError::InvalidPattern {
                route: self.name.clone(),
                pattern: self.path.pattern(),
                source,
            })?;
        self.constraints
            .compile()
            .map_err(|(pattern, source)| RouteError::InvalidPattern {
                route: self.name.clone(),
                pattern,
                source,
            })?;
        Ok(())
    }

    /// Re-apply the construction rules to a decoded route.
    ///
    /// Methods are cleaned up as in [`Route::new`], then the route is validated.
    pub(crate) fn restore(mut self) -> Result<Self> {
        self.methods = normalize_methods(&self.methods);
        if self.methods.is_empty() {
            return Err(RouteError::EmptyMethods { route: self.name });
        }
        self.validate()?;
        Ok(self)
    }

    /// Match `path` against this route.
    ///
    /// Returns the extracted attributes on success. The candidate is
    /// normalized the same way as the template.
    pub fn matches(&self, path: &str) -> Option<RouteMatch> {
        let candidate = normalize(path);

        let template = match self.path.compile() {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(route = %self.name, error = %e, "Route template does not compile");
                return None;
            }
        };

        let Some(captures) = template.captures(&candidate) else {
            metrics::record_route_match(false);
            return None;
        };

        let constraints = match self.constraints.compile() {
            Ok(constraints) => constraints,
            Err((pattern, e)) => {
                tracing::warn!(route = %self.name, %pattern, error = %e, "Route constraint does not compile");
                return None;
            }
        };

        let mut attributes = IndexMap::with_capacity(captures.len());
        for (name, value) in captures {
            if !constraints.allows(name, value) {
                metrics::record_route_match(false);
                return None;
            }
            attributes.insert(name.to_string(), value.to_string());
        }

        metrics::record_route_match(true);
        Some(RouteMatch { attributes })
    }

    /// Boolean view of [`Route::matches`].
    pub fn is_match(&self, path: &str) -> bool {
        self.matches(path).is_some()
    }
}

fn normalize_methods<I, S>(methods: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for method in methods {
        let method = method.as_ref().trim().to_ascii_uppercase();
        if !method.is_empty() && !out.contains(&method) {
            out.push(method);
        }
    }
    if out.iter().any(|m| m == GET) && !out.iter().any(|m| m == HEAD) {
        out.push(HEAD.to_string());
    }
    out
}
