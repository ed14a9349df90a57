//! Configuration schema definitions.
//!
//! This module defines the routing manifest: cache settings, logging, and the
//! controller declarations routes are discovered from. All types derive Serde
//! traits for deserialization from TOML.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::discovery::declaration::DEFAULT_METHODS;
use crate::discovery::{
    ControllerRegistry, ControllerRoute, HandlerMetadata, OptionValue, RouteAttribute, RouteCollector,
};
use crate::error::Result;

/// Root of the routing manifest.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Route snapshot cache.
    pub cache: CacheConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Handler types and their route declarations.
    pub controllers: Vec<ControllerConfig>,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding snapshots. `None` disables caching.
    pub dir: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error, or an env-filter directive).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Class-level declaration of one handler type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Fully-qualified handler type identifier.
    pub id: String,

    /// Path prefix applied to every route.
    #[serde(default)]
    pub path: String,

    /// Default format for every route.
    #[serde(default)]
    pub format: Option<String>,

    /// Method-level declarations, in declaration order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Method-level declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Handler method serving the route.
    pub action: String,

    /// Path suffix appended to the controller prefix.
    #[serde(default)]
    pub path: String,

    /// Route name, unique within a route set.
    pub name: String,

    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Format override.
    #[serde(default)]
    pub format: Option<String>,

    /// Where-options, applied in order.
    #[serde(default)]
    pub options: IndexMap<String, OptionValue>,
}

fn default_methods() -> Vec<String> {
    DEFAULT_METHODS.iter().map(|m| m.to_string()).collect()
}

impl ControllerConfig {
    /// Declarations for this handler type, grouped by action in first-seen order.
    pub fn metadata(&self) -> HandlerMetadata {
        let mut actions: IndexMap<&str, Vec<RouteAttribute>> = IndexMap::new();
        for route in &self.routes {
            actions
                .entry(route.action.as_str())
                .or_default()
                .push(route.attribute());
        }

        let mut controller = ControllerRoute::new(&self.path);
        if let Some(format) = &self.format {
            controller = controller.with_format(format.clone());
        }

        actions
            .into_iter()
            .fold(HandlerMetadata::new(&self.id).controller(controller), |meta, (action, routes)| {
                meta.action(action, routes)
            })
    }
}

impl RouteConfig {
    fn attribute(&self) -> RouteAttribute {
        let attribute = RouteAttribute::new(&self.path, &self.name)
            .with_methods(self.methods.iter().cloned())
            .with_options(self.options.clone());
        match &self.format {
            Some(format) => attribute.with_format(format.clone()),
            None => attribute,
        }
    }
}

impl RoutingConfig {
    /// Registry holding every declared controller.
    pub fn registry(&self) -> ControllerRegistry {
        self.controllers
            .iter()
            .fold(ControllerRegistry::new(), |registry, c| registry.with(c.metadata()))
    }

    /// Declared handler type ids, in manifest order.
    pub fn handler_ids(&self) -> Vec<String> {
        self.controllers.iter().map(|c| c.id.clone()).collect()
    }

    /// Collector over every declared controller, cached if a directory is set.
    pub fn collector(&self) -> Result<RouteCollector<ControllerRegistry>> {
        let collector = RouteCollector::new(self.registry(), self.handler_ids());
        match &self.cache.dir {
            Some(dir) => collector.with_cache_dir(dir.clone()),
            None => Ok(collector),
        }
    }
}
