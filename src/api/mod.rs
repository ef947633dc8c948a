//! API module - route modules, handlers, models and the router aggregator

pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;

pub use registry::{RouteInfo, RouteModule, RouterAggregator};
