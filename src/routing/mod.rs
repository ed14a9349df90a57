//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route construction:
//!     name + template + handler + methods
//!     → path.rs (normalize template)
//!     → constraint.rs (where-clauses, may rewrite {name} → {name*})
//!     → Route
//!
//! Matching (per request):
//!     candidate path
//!     → path.rs (normalize, compile template, capture)
//!     → constraint.rs (validate every capture)
//!     → RouteMatch (attributes) or no match
//! ```
//!
//! # Design Decisions
//! - Routes are values: matching never mutates them
//! - Shape mismatch and constraint violation are indistinguishable
//! - No trie or DFA; `Router` scans in registration order

pub mod constraint;
pub mod path;
pub mod route;
pub mod router;

pub use constraint::{Constraint, ConstraintSet};
pub use path::{normalize, PathTemplate, Placeholder};
pub use route::{Handler, Route, RouteMatch};
pub use router::{RouteLookup, Router};
