//! Shared fixtures for integration tests.

use routekit::{ControllerRegistry, ControllerRoute, HandlerMetadata, RouteAttribute};

pub const USER: &str = "tests::controller::UserController";
pub const PRODUCT: &str = "tests::controller::ProductController";
pub const API: &str = "tests::controller::ApiController";
pub const PING: &str = "tests::controller::PingController";

pub const ALL: [&str; 4] = [USER, PRODUCT, API, PING];

/// Registry with the User, Product, Api and Ping controllers (9 routes).
pub fn registry() -> ControllerRegistry {
    ControllerRegistry::new()
        .with(
            HandlerMetadata::new(USER)
                .action("list", vec![RouteAttribute::new("/users", "user_list").with_methods(["GET"])])
                .action(
                    "show",
                    vec![RouteAttribute::new("/users/{id}", "user_show")
                        .with_methods(["GET"])
                        .option("whereNumber", "id")],
                )
                .action("create", vec![RouteAttribute::new("/users", "user_create").with_methods(["POST"])]),
        )
        .with(
            HandlerMetadata::new(PRODUCT)
                .action(
                    "index",
                    vec![RouteAttribute::new("/products", "product_index").with_methods(["GET"])],
                )
                .action(
                    "update",
                    vec![RouteAttribute::new("/products/{id}", "product_update")
                        .with_methods(["PUT"])
                        .option("whereNumber", "id")],
                )
                .action(
                    "delete",
                    vec![RouteAttribute::new("/products/{id}", "product_delete").with_methods(["DELETE"])],
                ),
        )
        .with(
            HandlerMetadata::new(API)
                .action("index", vec![RouteAttribute::new("/api", "api_index").with_methods(["GET"])])
                .action("post", vec![RouteAttribute::new("/api", "api_post").with_methods(["POST"])]),
        )
        .with(
            HandlerMetadata::new(PING)
                .controller(ControllerRoute::new("/api").with_format("json"))
                .action("ping", vec![RouteAttribute::new("ping", "ping").with_methods(["GET"])]),
        )
}
