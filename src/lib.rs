//! Route MCP Library
//!
//! Exposes the routes of an axum application as Model Context Protocol
//! tools. Each registered route becomes a tool whose input schema is derived
//! from the route's schema; calling the tool executes the route in-process
//! and returns its response.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server, the axum
//!   integration and the transports (HTTP with SSE sessions or stateless
//!   JSON-RPC, STDIO)
//! - **domains**: the bridge itself
//!   - **schema**: schema nodes, `$ref` resolution, example synthesis
//!   - **routes**: route registry and filter
//!   - **tools**: route -> tool conversion and tool call dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::routing::get;
//! use route_mcp::{Config, McpRouter, RouteDefinition, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let app = McpRouter::new(config)
//!         .route(RouteDefinition::get("/hello"), get(|| async { "Hello World" }))
//!         .build();
//!     transport.run(app).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpApp, McpRouter, McpServer, Result, TransportService};
pub use domains::routes::{RouteDefinition, RouteDescriptor};
