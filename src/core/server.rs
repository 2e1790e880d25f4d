//! MCP Server implementation and lifecycle management.
//!
//! The server owns the configuration and the tool catalogue. The HTTP
//! transports reach it through [`McpServer::list_tools`] and
//! [`McpServer::call_tool`]; the STDIO transport through the rmcp
//! `ServerHandler` implementation below.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::tools::{ToolError, ToolRegistry, ToolSpec};

/// The main MCP server handler.
#[derive(Clone, Debug)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Route-backed tool catalogue.
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a new MCP server over the given tool catalogue.
    pub fn new(config: Arc<Config>, tools: ToolRegistry) -> Self {
        Self { config, tools }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Free-form description, forwarded to clients as instructions.
    pub fn description(&self) -> Option<&str> {
        self.config.server.description.as_deref()
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// The current tool catalogue.
    pub fn list_tools(&self) -> Vec<ToolSpec> {
        self.tools.list_tools()
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, ToolError> {
        self.tools.call_tool(name, arguments).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: self.config.server.description.clone(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.tools.list_rmcp_tools();
        info!("Listing {} tools", tools.len());
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        self.tools
            .call_tool(&request.name, request.arguments.unwrap_or_default())
            .await
            .map_err(McpError::from)
    }
}
