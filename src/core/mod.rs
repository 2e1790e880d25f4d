//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the bridge,
//! including error handling, configuration, the MCP server handler, the
//! axum integration and the transport layer.

pub mod config;
pub mod error;
pub mod framework;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use framework::{McpApp, McpRouter};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};

#[cfg(test)]
pub(crate) mod test_support {
    use axum::routing::get;
    use serde_json::json;

    use super::{Config, McpApp, McpRouter, McpServer};
    use crate::domains::routes::RouteDefinition;

    /// An application with a single documented `hello` route.
    pub(crate) fn hello_app(config: Config) -> McpApp {
        McpRouter::new(config)
            .route(
                RouteDefinition::get("/hello").schema(json!({
                    "operationId": "hello",
                    "summary": "Hello World",
                    "description": "Says hello"
                })),
                get(|| async { "Hello World" }),
            )
            .build()
    }

    pub(crate) fn hello_server() -> McpServer {
        hello_app(Config::default()).server
    }
}
