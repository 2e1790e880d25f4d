//! Transport layer for the MCP bridge.
//!
//! This module provides the transport implementations:
//! - **HTTP**: the application router with the MCP endpoints mounted,
//!   either SSE sessions or stateless JSON-RPC over POST
//! - **STDIO**: standard input/output via rmcp - feature: `stdio`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

pub mod http;
pub mod rpc;
pub mod session;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::{HttpConfig, TransportConfig, TransportMode};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
pub use session::{SessionError, SessionManager, SessionStream};
