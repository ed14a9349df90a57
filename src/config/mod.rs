//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routing manifest (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RoutingConfig (validated)
//!     → registry() / collector() for route discovery
//! ```
//!
//! # Design Decisions
//! - All sections have defaults so an empty manifest is valid
//! - Validation separates syntactic (serde) from semantic checks
//! - Option order is preserved: later options act after earlier ones

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CacheConfig, ControllerConfig, ObservabilityConfig, RouteConfig, RoutingConfig};
pub use validation::{validate_config, ValidationError};
