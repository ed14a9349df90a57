//! Crate error type.
//!
//! Every failure is raised synchronously to the immediate caller. Nothing is
//! retried internally and nothing is swallowed. Matching never fails with an
//! error; a path that does not fit a route is simply "no match".

use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;

/// Errors raised while building routes, discovering them, or caching them.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A cache operation was requested on a collector without a cache.
    #[error("cache is not enabled; configure a cache location when building the collector")]
    CacheDisabled,

    /// The configured cache directory does not exist.
    #[error("cache directory \"{}\" does not exist", .0.display())]
    InvalidCacheLocation(PathBuf),

    /// A route was constructed with an empty method set.
    #[error("route \"{route}\": HTTP methods argument was empty; must contain at least one method")]
    EmptyMethods { route: String },

    /// A where-option key lacks the `where` prefix or is the bare prefix.
    #[error("invalid option \"{key}\"; options must start with \"where\"")]
    InvalidOptionKey { key: String },

    /// A where-option key is well formed but names no known constraint.
    #[error("unknown constraint option \"{key}\"")]
    UnknownConstraint { key: String },

    /// A constraint option received the wrong number of parameter names.
    #[error("option \"{key}\" expects {expected} parameter name(s), got {actual}")]
    ConstraintArity {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// The metadata source has no declarations for a handler type.
    #[error("unknown handler type \"{0}\"")]
    UnknownHandler(String),

    /// A template or constraint does not compile.
    #[error("route \"{route}\": invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        route: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Reading or writing a cache snapshot failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouteError>;
