//! Tool-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Errors that can occur while listing or calling route-backed tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool in the current catalogue carries this name.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments could not be turned into a request.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The synthetic request could not be executed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// JSON-RPC error code for this failure.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::InvalidArguments(_) => -32602,
            Self::ExecutionFailed(_) => -32603,
        }
    }
}

impl From<ToolError> for McpError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound(_) | ToolError::InvalidArguments(_) => {
                McpError::invalid_params(error.to_string(), None)
            }
            ToolError::ExecutionFailed(_) => {
                McpError::internal_error(error.to_string(), None)
            }
        }
    }
}
