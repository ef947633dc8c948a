//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::PingResponse;
use crate::api::registry::{RouteModule, RouterAggregator};
use utoipa::OpenApi;

/// Tag grouping health endpoints in the API documentation
pub const HEALTH_TAG: &str = "health";

/// OpenAPI fragment for the ping module, paths relative to its mount point
#[derive(OpenApi)]
#[openapi(paths(handlers::ping), components(schemas(PingResponse)))]
struct PingDoc;

/// Health check routes
pub fn ping_module() -> RouteModule {
    RouteModule::new("ping")
        .get("/ping", handlers::ping)
        .with_docs(PingDoc::openapi())
}

/// Create the versioned API, every module mounted under `prefix`
pub fn create_router(prefix: &str) -> RouterAggregator {
    RouterAggregator::new().mount(ping_module(), prefix, &[HEALTH_TAG])
}
