//! Request routing core.
//!
//! Maps path templates to named route descriptors, matches concrete paths
//! against them with per-parameter constraints, and collects routes from
//! handler declarations with an optional per-handler snapshot cache.
//!
//! ```text
//! handler ids → discovery (declarations → Route list) ⇄ cache (snapshots)
//!                    │
//!                    ▼
//!             routing (Route::matches → attributes, Router::lookup)
//! ```

// Core subsystems
pub mod cache;
pub mod discovery;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use config::RoutingConfig;
pub use discovery::{ControllerRegistry, ControllerRoute, HandlerMetadata, RouteAttribute, RouteCollector};
pub use error::{Result, RouteError};
pub use routing::{Handler, Route, RouteLookup, RouteMatch, Router};
