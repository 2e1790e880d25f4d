//! Error types and handling for the MCP bridge.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies.

use thiserror::Error;

use super::transport::{SessionError, TransportError};
use crate::domains::tools::ToolError;

/// A specialized Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP bridge.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error raised while serving a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error raised when addressing an SSE session.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
