//! Transport service - runs a built application on the configured transport.

use tracing::info;

use super::http::HttpTransport;
use super::{TransportConfig, TransportResult};
use crate::core::framework::McpApp;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

/// Transport service - manages the transport layer for the MCP bridge.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Create a transport service from environment variables.
    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Log information about the configured transport.
    pub fn log_info(&self) {
        info!("Starting transport: {}", self.config.description());
    }

    /// Start the transport with the given application.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, app: McpApp) -> TransportResult<()> {
        self.log_info();

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(app.server).await,
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(app.router).await,
        }
    }
}
