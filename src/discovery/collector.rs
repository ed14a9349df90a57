//! Route collection from handler declarations.
//!
//! # Responsibilities
//! - Realize routes from class-level + method-level declarations
//! - Validate and dispatch where-options onto route constraints
//! - Serve per-handler route lists from the cache when one is configured
//!
//! # Design Decisions
//! - Any invalid declaration fails the whole call; no partial lists
//! - Duplicate route names: the later route replaces the earlier one in place
//! - `generate_cache` always rediscovers and overwrites existing snapshots

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

use crate::cache::{CacheStore, FileCacheStore, RouteCache};
use crate::discovery::declaration::{ControllerRoute, RouteAttribute};
use crate::discovery::registry::MetadataSource;
use crate::error::{Result, RouteError};
use crate::observability::metrics;
use crate::routing::{Constraint, Handler, Route};

/// Collects routes for a fixed set of handler types.
#[derive(Debug)]
pub struct RouteCollector<S> {
    source: S,
    handlers: Vec<String>,
    cache: Option<RouteCache>,
}

impl<S: MetadataSource> RouteCollector<S> {
    /// Create a collector without caching. Duplicate handler ids are dropped.
    pub fn new<I, T>(source: S, handlers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let handlers: IndexSet<String> = handlers.into_iter().map(Into::into).collect();
        Self {
            source,
            handlers: handlers.into_iter().collect(),
            cache: None,
        }
    }

    /// Cache snapshots as files in `dir`, which must already exist.
    pub fn with_cache_dir(self, dir: impl Into<PathBuf>) -> Result<Self> {
        let store = FileCacheStore::open(dir)?;
        Ok(self.with_cache_store(store))
    }

    pub fn with_cache_store(mut self, store: impl CacheStore + 'static) -> Self {
        self.cache = Some(RouteCache::new(store));
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn handlers(&self) -> &[String] {
        &self.handlers
    }

    pub fn cache(&self) -> Option<&RouteCache> {
        self.cache.as_ref()
    }

    /// Routes of every handler type, in handler then declaration order.
    pub fn collect(&self) -> Result<Vec<Route>> {
        let mut routes: IndexMap<String, Route> = IndexMap::new();
        for handler in &self.handlers {
            for route in self.routes_for(handler)? {
                routes.insert(route.name().to_string(), route);
            }
        }
        Ok(routes.into_values().collect())
    }

    /// Rediscover every handler type and overwrite its snapshot.
    pub fn generate_cache(&self) -> Result<()> {
        let cache = self.cache.as_ref().ok_or(RouteError::CacheDisabled)?;
        for handler in &self.handlers {
            let routes = self.discover(handler)?;
            cache.save(handler, &routes)?;
        }
        Ok(())
    }

    /// Delete the snapshot of every handler type, if present.
    pub fn clear_cache(&self) -> Result<()> {
        let cache = self.cache.as_ref().ok_or(RouteError::CacheDisabled)?;
        for handler in &self.handlers {
            cache.remove(handler)?;
        }
        Ok(())
    }

    fn routes_for(&self, handler: &str) -> Result<Vec<Route>> {
        let Some(cache) = &self.cache else {
            return self.discover(handler);
        };

        if let Some(routes) = cache.load(handler)? {
            tracing::debug!(%handler, routes = routes.len(), "Route cache hit");
            metrics::record_cache_lookup(true);
            return Ok(routes);
        }

        tracing::debug!(%handler, "Route cache miss");
        metrics::record_cache_lookup(false);
        let routes = self.discover(handler)?;
        cache.save(handler, &routes)?;
        Ok(routes)
    }

    fn discover(&self, handler: &str) -> Result<Vec<Route>> {
        let metadata = self
            .source
            .metadata(handler)
            .ok_or_else(|| RouteError::UnknownHandler(handler.to_string()))?;
        let controller = metadata.controller_route();

        let mut routes: IndexMap<String, Route> = IndexMap::new();
        for action in metadata.actions() {
            for attribute in &action.routes {
                let route = realize(handler, &action.name, &controller, attribute)?;
                routes.insert(route.name().to_string(), route);
            }
        }

        tracing::debug!(%handler, routes = routes.len(), "Discovered routes");
        metrics::record_routes_discovered(routes.len());
        Ok(routes.into_values().collect())
    }
}

/// Build the route for one method-level declaration.
pub fn realize(
    handler: &str,
    action: &str,
    controller: &ControllerRoute,
    attribute: &RouteAttribute,
) -> Result<Route> {
    let path = format!("{}{}", controller.path(), attribute.path());
    let mut route = Route::new(
        attribute.name(),
        &path,
        Handler::new(handler, action),
        attribute.methods(),
    )?;

    let format = attribute
        .format()
        .filter(|f| !f.is_empty())
        .or(controller.format());
    route.set_format(format.map(str::to_string));

    for (key, value) in attribute.options() {
        let constraint = Constraint::from_option_key(key)?;
        let names = value.names();
        constraint.check_arity(key, names.len())?;
        route.apply_constraint(constraint, names.iter().cloned());
    }

    route.validate()?;
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{cache_key, MemoryCacheStore};
    use crate::discovery::declaration::HandlerMetadata;
    use crate::discovery::registry::ControllerRegistry;

    fn ping_registry() -> ControllerRegistry {
        ControllerRegistry::new().with(
            HandlerMetadata::new("PingController")
                .controller(ControllerRoute::new("/api").with_format("json"))
                .action("ping", vec![RouteAttribute::new("ping", "ping").with_methods(["GET"])]),
        )
    }

    #[test]
    fn test_realize_merges_controller_and_method() {
        let controller = ControllerRoute::new("/api").with_format("json");
        let attribute = RouteAttribute::new("ping", "ping").with_methods(["GET"]);
        let route = realize("PingController", "ping", &controller, &attribute).unwrap();

        assert_eq!(route.path(), "/api/ping");
        assert_eq!(route.format(), Some("json"));
        assert_eq!(route.methods(), ["GET", "HEAD"]);
        assert_eq!(route.handler(), &Handler::new("PingController", "ping"));
    }

    #[test]
    fn test_realize_format_override_and_fallback() {
        let controller = ControllerRoute::new("").with_format("json");
        let xml = RouteAttribute::new("/feed", "feed").with_format("xml");
        let empty = RouteAttribute::new("/feed2", "feed2").with_format("");

        let route = realize("Feed", "xml", &controller, &xml).unwrap();
        assert_eq!(route.format(), Some("xml"));
        assert_eq!(route.path(), "/feed");

        let route = realize("Feed", "empty", &controller, &empty).unwrap();
        assert_eq!(route.format(), Some("json"));

        let route = realize("Feed", "none", &ControllerRoute::default(), &empty).unwrap();
        assert_eq!(route.format(), None);
    }

    #[test]
    fn test_realize_options() {
        let attribute = RouteAttribute::new("/blog/{slug}/{id}", "blog")
            .option("whereNumber", "id")
            .option("whereSlug", ["slug"]);
        let route = realize("Blog", "show", &ControllerRoute::default(), &attribute).unwrap();
        assert!(route.is_match("/blog/a-b/12"));
        assert!(!route.is_match("/blog/a-b/x"));

        let attribute = RouteAttribute::new("/files/{path}", "files").option("whereAnything", "path");
        let route = realize("Files", "show", &ControllerRoute::default(), &attribute).unwrap();
        assert_eq!(route.path(), "/files/{path*}");
    }

    #[test]
    fn test_realize_rejects_bad_options() {
        let controller = ControllerRoute::default();
        for key in ["where", "number", "Wherenumber"] {
            let attribute = RouteAttribute::new("/x/{id}", "x").option(key, "id");
            let err = realize("X", "x", &controller, &attribute).unwrap_err();
            assert!(matches!(err, RouteError::InvalidOptionKey { .. }), "{key}");
        }

        let attribute = RouteAttribute::new("/x/{id}", "x").option("whereInvalid", "id");
        let err = realize("X", "x", &controller, &attribute).unwrap_err();
        assert!(matches!(err, RouteError::UnknownConstraint { .. }));

        let attribute = RouteAttribute::new("/x/{a}/{b}", "x").option("whereAnything", ["a", "b"]);
        let err = realize("X", "x", &controller, &attribute).unwrap_err();
        assert!(matches!(
            err,
            RouteError::ConstraintArity { expected: 1, actual: 2, .. }
        ));
    }

    #[test]
    fn test_realize_rejects_empty_methods() {
        let attribute = RouteAttribute::new("/x", "x").with_methods(Vec::<String>::new());
        let err = realize("X", "x", &ControllerRoute::default(), &attribute).unwrap_err();
        assert!(matches!(err, RouteError::EmptyMethods { .. }));
    }

    #[test]
    fn test_collect_without_cache() {
        let collector = RouteCollector::new(ping_registry(), ["PingController", "PingController"]);
        assert_eq!(collector.handlers(), ["PingController"]);
        assert!(!collector.cache_enabled());

        let routes = collector.collect().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/api/ping");

        assert!(matches!(collector.generate_cache(), Err(RouteError::CacheDisabled)));
        assert!(matches!(collector.clear_cache(), Err(RouteError::CacheDisabled)));
    }

    #[test]
    fn test_unknown_handler_fails_collect() {
        let collector = RouteCollector::new(ping_registry(), ["PingController", "Missing"]);
        assert!(matches!(
            collector.collect(),
            Err(RouteError::UnknownHandler(id)) if id == "Missing"
        ));
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let registry = ping_registry().with(
            HandlerMetadata::new("OtherPing")
                .action("ping", vec![RouteAttribute::new("/v2/ping", "ping").with_methods(["GET"])]),
        );
        let collector = RouteCollector::new(&registry, ["PingController", "OtherPing"]);
        let routes = collector.collect().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/v2/ping");
        assert_eq!(routes[0].format(), None);
    }

    #[test]
    fn test_invalid_snapshot_fails_collect() {
        let store = MemoryCacheStore::new();
        let blob = br#"[{"name":"x","path":"/x/{id}","handler":{"controller":"PingController"},"methods":[],"constraints":{"id":"[0-9"}}]"#;
        store.set(&cache_key("PingController"), blob).unwrap();

        let collector = RouteCollector::new(ping_registry(), ["PingController"]).with_cache_store(store);
        assert!(matches!(collector.collect(), Err(RouteError::EmptyMethods { .. })));

        // Regenerating replaces the bad snapshot with a discovered one.
        collector.generate_cache().unwrap();
        let routes = collector.collect().unwrap();
        assert_eq!(routes[0].path(), "/api/ping");
    }

    #[test]
    fn test_cache_populated_on_collect() {
        let store = MemoryCacheStore::new();
        let collector =
            RouteCollector::new(ping_registry(), ["PingController"]).with_cache_store(store.clone());

        let routes = collector.collect().unwrap();
        assert_eq!(store.len(), 1);

        let cached = RouteCollector::new(ControllerRegistry::new(), ["PingController"])
            .with_cache_store(store.clone());
        assert_eq!(cached.collect().unwrap(), routes);

        cached.clear_cache().unwrap();
        assert!(store.is_empty());
        assert!(matches!(cached.collect(), Err(RouteError::UnknownHandler(_))));
    }
}
