//! Configuration management for the MCP bridge.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The custom route
//! predicate is not part of it: closures are installed programmatically
//! through `McpRouter::with_filter`.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the MCP bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tool catalogue configuration.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Free-form description sent to clients as server instructions.
    pub description: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Controls how routes are turned into tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Append an example response and the response schema to descriptions.
    pub describe_full_schema: bool,

    /// Leave routes answering HEAD out of the catalogue.
    pub skip_head_routes: bool,

    /// Leave routes answering OPTIONS out of the catalogue.
    pub skip_options_routes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "route-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            describe_full_schema: false,
            skip_head_routes: true,
            skip_options_routes: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(description) = std::env::var("MCP_SERVER_DESCRIPTION") {
            config.server.description = Some(description);
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(flag) = env_flag("MCP_DESCRIBE_FULL_SCHEMA") {
            config.tools.describe_full_schema = flag;
        }

        if let Some(flag) = env_flag("MCP_SKIP_HEAD_ROUTES") {
            config.tools.skip_head_routes = flag;
        }

        if let Some(flag) = env_flag("MCP_SKIP_OPTIONS_ROUTES") {
            config.tools.skip_options_routes = flag;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}

/// Read a boolean environment variable.
///
/// Accepts `true`/`false`/`1`/`0`; anything else is ignored with a warning.
pub(crate) fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        other => {
            warn!("Ignoring {}={:?}: expected a boolean", name, other);
            None
        }
    }
}
