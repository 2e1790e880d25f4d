//! Transport configuration types.

use serde::{Deserialize, Serialize};

use crate::core::config::env_flag;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport. The application's routes are still
    /// executed in-process; no listener is opened.
    #[cfg(feature = "stdio")]
    Stdio,

    /// The application served over HTTP with the MCP endpoints mounted.
    Http(HttpConfig),
}

/// How MCP messages travel over HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// One SSE stream per client; messages are posted with a session id.
    #[default]
    Sse,

    /// One shared processor; each POST carries a request and gets the
    /// response in its body. No session tracking.
    Stateless,
}

impl TransportMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "sse" | "session" => Some(Self::Sse),
            "stateless" | "streamable" => Some(Self::Stateless),
            _ => None,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path under which the MCP endpoints are mounted.
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Session-based or stateless message flow.
    #[serde(default)]
    pub mode: TransportMode,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Serve the current catalogue at `{mount_path}/tools`.
    #[serde(default)]
    pub debug_tools_endpoint: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mount_path() -> String {
    "/mcp".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Http(HttpConfig::default())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            mount_path: default_mount_path(),
            mode: TransportMode::default(),
            enable_cors: default_cors(),
            debug_tools_endpoint: false,
        }
    }
}

impl HttpConfig {
    /// Mount path without a trailing slash; `/` becomes the empty string.
    pub fn normalized_mount_path(&self) -> String {
        let trimmed = self.mount_path.trim_end_matches('/');
        if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// The HTTP settings, or defaults when another transport is selected.
    ///
    /// The MCP endpoints are mounted on the application router either way.
    pub fn http_config(&self) -> HttpConfig {
        match self {
            Self::Http(cfg) => cfg.clone(),
            #[cfg(feature = "stdio")]
            Self::Stdio => HttpConfig::default(),
        }
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            _ => {
                let defaults = HttpConfig::default();
                let port = std::env::var("MCP_HTTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port);
                let host = std::env::var("MCP_HTTP_HOST").unwrap_or(defaults.host);
                let mount_path = std::env::var("MCP_HTTP_PATH").unwrap_or(defaults.mount_path);
                let mode = std::env::var("MCP_HTTP_MODE")
                    .ok()
                    .and_then(|m| TransportMode::parse(&m))
                    .unwrap_or(defaults.mode);
                let enable_cors = env_flag("MCP_HTTP_CORS").unwrap_or(defaults.enable_cors);
                let debug_tools_endpoint =
                    env_flag("MCP_HTTP_DEBUG_TOOLS").unwrap_or(defaults.debug_tools_endpoint);
                Self::Http(HttpConfig {
                    port,
                    host,
                    mount_path,
                    mode,
                    enable_cors,
                    debug_tools_endpoint,
                })
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Http(cfg) => format!(
                "HTTP on {}:{}{} ({:?})",
                cfg.host, cfg.port, cfg.mount_path, cfg.mode
            ),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_defaults() {
        let cfg = HttpConfig::default();
        assert_eq!(cfg.mount_path, "/mcp");
        assert_eq!(cfg.mode, TransportMode::Sse);
        assert!(!cfg.debug_tools_endpoint);
        assert!(!TransportConfig::default().is_stdio());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(TransportMode::parse("SSE"), Some(TransportMode::Sse));
        assert_eq!(TransportMode::parse("stateless"), Some(TransportMode::Stateless));
        assert_eq!(TransportMode::parse("carrier-pigeon"), None);
    }

    #[test]
    fn test_normalized_mount_path() {
        let mut cfg = HttpConfig::default();
        assert_eq!(cfg.normalized_mount_path(), "/mcp");

        cfg.mount_path = "/api/mcp/".to_string();
        assert_eq!(cfg.normalized_mount_path(), "/api/mcp");

        cfg.mount_path = "tools".to_string();
        assert_eq!(cfg.normalized_mount_path(), "/tools");
    }

    #[test]
    fn test_deserialize_tagged_http() {
        let cfg: TransportConfig =
            serde_json::from_str(r#"{"type": "http", "port": 9000, "mode": "stateless"}"#).unwrap();
        let http = cfg.http_config();
        assert_eq!(http.port, 9000);
        assert_eq!(http.mode, TransportMode::Stateless);
        assert_eq!(http.host, "127.0.0.1");
    }
}
