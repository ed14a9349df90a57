//! Route table and lookup.
//!
//! # Responsibilities
//! - Store routes keyed by name, preserving registration order
//! - Look up the route serving a method + path
//! - Return an explicit outcome: matched, method not allowed, or not found
//!
//! # Design Decisions
//! - Registering an existing name replaces the route in place (last write wins)
//! - O(n) scan in registration order; the first matching route wins
//! - Ordering between overlapping templates is the caller's responsibility

use indexmap::IndexMap;

use crate::routing::route::{Route, RouteMatch};

/// Outcome of [`Router::lookup`].
#[derive(Debug)]
pub enum RouteLookup<'a> {
    /// A route matched both path and method.
    Matched {
        route: &'a Route,
        matched: RouteMatch,
    },
    /// The path matched routes, none of which accepts the method.
    MethodNotAllowed { allowed: Vec<String> },
    NotFound,
}

/// Name-keyed route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: IndexMap<String, Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router from routes; later duplicates replace earlier ones.
    pub fn with_routes(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut router = Self::new();
        router.extend(routes);
        router
    }

    /// Register a route, returning the one it replaced.
    pub fn add(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.name().to_string(), route)
    }

    pub fn extend(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            self.add(route);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the first route matching `path` that accepts `method`.
    pub fn lookup(&self, method: &str, path: &str) -> RouteLookup<'_> {
        let mut allowed: Vec<String> = Vec::new();
        for route in self.routes.values() {
            let Some(matched) = route.matches(path) else {
                continue;
            };
            if route.allows_method(method) {
                tracing::debug!(route = %route.name(), %method, %path, "Route matched");
                return RouteLookup::Matched { route, matched };
            }
            for m in route.methods() {
                if !allowed.contains(m) {
                    allowed.push(m.clone());
                }
            }
        }

        if allowed.is_empty() {
            RouteLookup::NotFound
        } else {
            RouteLookup::MethodNotAllowed { allowed }
        }
    }
}

impl FromIterator<Route> for Router {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        Self::with_routes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::Handler;

    fn users() -> Router {
        Router::with_routes([
            Route::get("user_list", "/users", Handler::new("UserController", "list")),
            Route::get("user_show", "/users/{id}", Handler::new("UserController", "show"))
                .where_number(["id"]),
            Route::post("user_create", "/users", Handler::new("UserController", "create")),
        ])
    }

    #[test]
    fn test_lookup_matched() {
        let router = users();
        match router.lookup("GET", "/users/42") {
            RouteLookup::Matched { route, matched } => {
                assert_eq!(route.name(), "user_show");
                assert_eq!(matched.get("id"), Some("42"));
            }
            other => panic!("unexpected lookup: {:?}", other),
        }

        match router.lookup("POST", "/users") {
            RouteLookup::Matched { route, .. } => assert_eq!(route.name(), "user_create"),
            other => panic!("unexpected lookup: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_method_not_allowed() {
        let router = users();
        match router.lookup("DELETE", "/users") {
            RouteLookup::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec!["GET", "HEAD", "POST"]);
            }
            other => panic!("unexpected lookup: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_not_found() {
        let router = users();
        assert!(matches!(router.lookup("GET", "/users/abc"), RouteLookup::NotFound));
        assert!(matches!(router.lookup("GET", "/products"), RouteLookup::NotFound));
    }

    #[test]
    fn test_last_write_wins() {
        let mut router = users();
        let replaced = router.add(Route::get("user_list", "/people", Handler::invokable("People")));
        assert_eq!(replaced.unwrap().path(), "/users");
        assert_eq!(router.len(), 3);
        assert_eq!(router.routes().next().unwrap().path(), "/people");
    }
}
