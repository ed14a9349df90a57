//! Route discovery from handler declarations.
//!
//! # Data Flow
//! ```text
//! handler type ids
//!     → collector.rs (cache hit? → cached route list)
//!     → registry.rs (MetadataSource: class + method declarations)
//!     → declaration.rs (ControllerRoute + RouteAttribute)
//!     → collector::realize (prefix ⧺ suffix, format, where-options)
//!     → Route list (deduplicated by name) → cache snapshot
//! ```
//!
//! # Design Decisions
//! - Declarations are registered explicitly (or loaded from a manifest)
//! - Where-options go through a closed dispatch table
//! - Snapshots are keyed per handler type

pub mod collector;
pub mod declaration;
pub mod registry;

pub use collector::{realize, RouteCollector};
pub use declaration::{
    ActionMetadata, ControllerRoute, HandlerMetadata, OptionValue, RouteAttribute,
};
pub use registry::{ControllerRegistry, MetadataSource};
