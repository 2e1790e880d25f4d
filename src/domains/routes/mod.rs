//! Routes domain module.
//!
//! Holds what the web framework tells us about its routes:
//!
//! - `descriptor.rs` - registration payload and resolved descriptor types
//! - `registry.rs` - ordered, append-only store fed by `register_route`
//! - `filter.rs` - configured and custom predicates over the store

mod descriptor;
mod filter;
mod registry;

pub use descriptor::{HttpMethod, McpRouteConfig, RouteDefinition, RouteDescriptor};
pub use filter::{RouteFilter, RoutePredicate};
pub use registry::RouteRegistry;
