//! Parameter constraints (where-clauses).
//!
//! # Responsibilities
//! - Store one raw regex body per parameter name
//! - Provide the named constraint shapes (number, slug, uuid, ...)
//! - Map where-option keys onto constraints through a closed table
//!
//! # Design Decisions
//! - Bodies are stored without delimiters or anchors
//! - Validation anchors the whole body: `^(?:body)$`
//! - Unknown option keys are configuration errors, never a fallback

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Prefix every where-option key must carry.
pub const WHERE_PREFIX: &str = "where";

/// The named constraint shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Number,
    Slug,
    AlphaNumeric,
    Alpha,
    TwoSegments,
    Anything,
    Date,
    YearMonth,
    Email,
    Uuid,
    Bool,
}

impl Constraint {
    /// Regex body applied to each parameter.
    pub fn pattern(self) -> &'static str {
        match self {
            Constraint::Number => "[0-9]+",
            Constraint::Slug => "[a-z0-9-]+",
            Constraint::AlphaNumeric => "[a-zA-Z0-9]+",
            Constraint::Alpha => "[a-zA-Z]+",
            Constraint::TwoSegments => r"[a-zA-Z0-9\-_]+/[a-zA-Z0-9\-_]+",
            Constraint::Anything => ".+",
            Constraint::Date => r"\d{4}-\d{2}-\d{2}",
            Constraint::YearMonth => r"\d{4}-\d{2}",
            Constraint::Email => r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            Constraint::Uuid => {
                "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}"
            }
            Constraint::Bool => "true|false|1|0",
        }
    }

    /// Whether the constrained placeholder must be rewritten to `{name*}`.
    pub fn spans_segments(self) -> bool {
        matches!(self, Constraint::TwoSegments | Constraint::Anything)
    }

    /// Exact number of parameter names the constraint accepts, if fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            Constraint::Anything => Some(1),
            _ => None,
        }
    }

    /// Resolve a where-option key such as `whereNumber`.
    ///
    /// The `where` prefix is case-sensitive; the constraint name after it is not.
    pub fn from_option_key(key: &str) -> Result<Self> {
        let suffix = match key.strip_prefix(WHERE_PREFIX) {
            Some(suffix) if !suffix.is_empty() => suffix,
            _ => {
                return Err(RouteError::InvalidOptionKey {
                    key: key.to_string(),
                })
            }
        };

        let constraint = match suffix.to_ascii_lowercase().as_str() {
            "number" => Constraint::Number,
            "slug" => Constraint::Slug,
            "alphanumeric" => Constraint::AlphaNumeric,
            "alpha" => Constraint::Alpha,
            "twosegments" => Constraint::TwoSegments,
            "anything" => Constraint::Anything,
            "date" => Constraint::Date,
            "yearmonth" => Constraint::YearMonth,
            "email" => Constraint::Email,
            "uuid" => Constraint::Uuid,
            "bool" => Constraint::Bool,
            _ => {
                return Err(RouteError::UnknownConstraint {
                    key: key.to_string(),
                })
            }
        };
        Ok(constraint)
    }

    /// Check the number of parameter names given under option `key`.
    pub fn check_arity(self, key: &str, actual: usize) -> Result<()> {
        match self.arity() {
            Some(expected) if expected != actual => Err(RouteError::ConstraintArity {
                key: key.to_string(),
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }
}

/// Parameter name → regex body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    wheres: IndexMap<String, String>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pattern for a parameter, replacing any previous one.
    pub fn insert(&mut self, parameter: impl Into<String>, pattern: impl Into<String>) {
        self.wheres.insert(parameter.into(), pattern.into());
    }

    /// Apply a named constraint to each parameter.
    pub fn apply<I, S>(&mut self, constraint: Constraint, parameters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for parameter in parameters {
            self.insert(parameter, constraint.pattern());
        }
    }

    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.wheres.get(parameter).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.wheres.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wheres.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.wheres.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Compile every constraint with its anchors.
    pub fn compile(&self) -> std::result::Result<CompiledConstraints, (String, regex::Error)> {
        let mut compiled = IndexMap::with_capacity(self.wheres.len());
        for (parameter, body) in &self.wheres {
            let regex = Regex::new(&anchor(body)).map_err(|e| (body.clone(), e))?;
            compiled.insert(parameter.clone(), regex);
        }
        Ok(CompiledConstraints { compiled })
    }
}

fn anchor(body: &str) -> String {
    format!("^(?:{body})$")
}

/// Constraints ready for validation.
#[derive(Debug, Clone)]
pub struct CompiledConstraints {
    compiled: IndexMap<String, Regex>,
}

impl CompiledConstraints {
    /// True when no constraint exists for `parameter` or the value satisfies it.
    pub fn allows(&self, parameter: &str, value: &str) -> bool {
        self.compiled
            .get(parameter)
            .map_or(true, |regex| regex.is_match(value))
    }
}
