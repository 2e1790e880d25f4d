//! axum integration.
//!
//! - `router.rs` - the [`McpRouter`] builder that registers routes as they
//!   are mounted and assembles the final application
//! - `executor.rs` - executes tool calls in-process against the router

mod executor;
mod router;

pub use executor::RouterExecutor;
pub use router::{McpApp, McpRouter, axum_path};
