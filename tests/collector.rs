//! Route collection and snapshot caching.

use routekit::cache::cache_key;
use routekit::{
    ControllerRegistry, HandlerMetadata, Route, RouteAttribute, RouteCollector, RouteError, RouteLookup,
    Router,
};
use tempfile::TempDir;

mod common;

fn summary(routes: &[Route]) -> Vec<(String, String, Vec<String>, Option<String>)> {
    routes
        .iter()
        .map(|r| {
            (
                r.name().to_string(),
                r.path().to_string(),
                r.methods().to_vec(),
                r.format().map(str::to_string),
            )
        })
        .collect()
}

#[test]
fn test_collect_all_controllers() {
    let collector = RouteCollector::new(common::registry(), common::ALL);
    let routes = collector.collect().unwrap();
    assert_eq!(routes.len(), 9);
}

#[test]
fn test_collect_user_controller() {
    let collector = RouteCollector::new(common::registry(), [common::USER]);
    let routes = collector.collect().unwrap();

    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0].name(), "user_list");
    assert_eq!(routes[0].methods(), ["GET", "HEAD"]);
    assert_eq!(routes[1].name(), "user_show");
    assert_eq!(routes[1].methods(), ["GET", "HEAD"]);
    assert_eq!(routes[2].name(), "user_create");
    assert_eq!(routes[2].methods(), ["POST"]);
}

#[test]
fn test_collect_controller_without_prefix() {
    let collector = RouteCollector::new(common::registry(), [common::API]);
    let routes = collector.collect().unwrap();

    let paths: Vec<_> = routes.iter().map(|r| (r.name(), r.path())).collect();
    assert_eq!(paths, vec![("api_index", "/api"), ("api_post", "/api")]);
    assert_eq!(routes[1].methods(), ["POST"]);
    assert!(routes.iter().all(|r| r.format().is_none()));
}

#[test]
fn test_collect_ping_controller() {
    let collector = RouteCollector::new(common::registry(), [common::PING]);
    let routes = collector.collect().unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].path(), "/api/ping");
    assert_eq!(routes[0].methods(), ["GET", "HEAD"]);
    assert_eq!(routes[0].format(), Some("json"));
}

const BROKEN: &str = "tests::controller::BrokenController";

fn registry_with_option(key: &str) -> ControllerRegistry {
    common::registry().with(HandlerMetadata::new(BROKEN).action(
        "show",
        vec![RouteAttribute::new("/broken/{id}", "broken_show").option(key, "id")],
    ))
}

#[test]
fn test_invalid_option_fails_whole_collect() {
    for handlers in [[common::USER, BROKEN], [BROKEN, common::USER]] {
        let collector = RouteCollector::new(registry_with_option("whereInvalid"), handlers);
        assert!(matches!(
            collector.collect(),
            Err(RouteError::UnknownConstraint { key }) if key == "whereInvalid"
        ));

        let collector = RouteCollector::new(registry_with_option("where"), handlers);
        assert!(matches!(
            collector.collect(),
            Err(RouteError::InvalidOptionKey { key }) if key == "where"
        ));
    }

    let collector = RouteCollector::new(registry_with_option("whereNumber"), [common::USER, BROKEN]);
    assert_eq!(collector.collect().unwrap().len(), 4);
}

#[test]
fn test_missing_cache_dir_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("cache");
    let err = RouteCollector::new(common::registry(), common::ALL)
        .with_cache_dir(&missing)
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidCacheLocation(p) if p == missing));
}

#[test]
fn test_cache_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let uncached = RouteCollector::new(common::registry(), common::ALL)
        .collect()
        .unwrap();

    let collector = RouteCollector::new(common::registry(), common::ALL)
        .with_cache_dir(temp_dir.path())
        .unwrap();
    collector.generate_cache().unwrap();
    for controller in common::ALL {
        let file = temp_dir.path().join(format!("{}.json", cache_key(controller)));
        assert!(file.is_file(), "missing snapshot for {controller}");
    }

    // Fresh collector with no declarations: everything must come from the cache.
    let fresh = RouteCollector::new(ControllerRegistry::new(), common::ALL)
        .with_cache_dir(temp_dir.path())
        .unwrap();
    let cached = fresh.collect().unwrap();
    assert_eq!(summary(&cached), summary(&uncached));
    assert_eq!(cached, uncached);

    fresh.clear_cache().unwrap();
    for controller in common::ALL {
        let file = temp_dir.path().join(format!("{}.json", cache_key(controller)));
        assert!(!file.exists());
    }
    // Nothing cached any more, so discovery runs and the empty registry fails it.
    assert!(matches!(fresh.collect(), Err(RouteError::UnknownHandler(_))));

    // A second clear is a no-op.
    fresh.clear_cache().unwrap();
}

#[test]
fn test_collect_writes_snapshots_lazily() {
    let temp_dir = TempDir::new().unwrap();
    let collector = RouteCollector::new(common::registry(), [common::USER])
        .with_cache_dir(temp_dir.path())
        .unwrap();

    let snapshot = temp_dir.path().join(format!("{}.json", cache_key(common::USER)));
    assert!(!snapshot.exists());
    let first = collector.collect().unwrap();
    assert!(snapshot.is_file());
    assert_eq!(collector.collect().unwrap(), first);
}

#[test]
fn test_generate_cache_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = temp_dir.path().join(format!("{}.json", cache_key(common::PING)));
    std::fs::write(&snapshot, "[]").unwrap();

    let collector = RouteCollector::new(common::registry(), [common::PING])
        .with_cache_dir(temp_dir.path())
        .unwrap();
    assert!(collector.collect().unwrap().is_empty());

    collector.generate_cache().unwrap();
    assert_eq!(collector.collect().unwrap().len(), 1);
}

#[test]
fn test_router_over_collected_routes() {
    let routes = RouteCollector::new(common::registry(), common::ALL)
        .collect()
        .unwrap();
    let router: Router = routes.into_iter().collect();

    match router.lookup("PUT", "/products/12") {
        RouteLookup::Matched { route, matched } => {
            assert_eq!(route.name(), "product_update");
            assert_eq!(route.handler().to_string(), format!("{}::update", common::PRODUCT));
            assert_eq!(matched.get("id"), Some("12"));
        }
        other => panic!("unexpected lookup: {:?}", other),
    }

    assert!(matches!(router.lookup("GET", "/api/ping/"), RouteLookup::Matched { .. }));
    assert!(matches!(
        router.lookup("PATCH", "/api"),
        RouteLookup::MethodNotAllowed { .. }
    ));
}
