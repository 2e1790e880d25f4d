//! Tool Registry - central listing and dispatch for route-backed tools.
//!
//! This module provides:
//! - The current tool catalogue (registry -> filter -> converter)
//! - Dispatch of tool calls by name to the matching route

use rmcp::model::{CallToolResult, Tool};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::converter::ToolSpec;
use super::dispatcher::dispatch;
use super::error::ToolError;
use super::executor::RequestExecutor;
use crate::core::config::ToolsConfig;
use crate::domains::routes::{RouteDescriptor, RouteFilter, RouteRegistry};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - the catalogue exposed to MCP clients.
///
/// Nothing is cached: every call observes the route registry as it is now.
#[derive(Clone)]
pub struct ToolRegistry {
    routes: Arc<RouteRegistry>,
    filter: RouteFilter,
    executor: Arc<dyn RequestExecutor>,
    describe_full_schema: bool,
}

impl ToolRegistry {
    /// Create a new tool registry.
    ///
    /// Every route in `routes` must be reachable through `executor`; a route
    /// the executor cannot serve is listed but every call to it fails.
    pub fn new(
        routes: Arc<RouteRegistry>,
        filter: RouteFilter,
        executor: Arc<dyn RequestExecutor>,
        config: &ToolsConfig,
    ) -> Self {
        Self {
            routes,
            filter,
            executor,
            describe_full_schema: config.describe_full_schema,
        }
    }

    /// Routes that currently survive the filter, in registration order.
    pub fn exposed_routes(&self) -> Vec<Arc<RouteDescriptor>> {
        self.filter.filter_routes(&self.routes.routes())
    }

    /// Build the current catalogue.
    pub fn list_tools(&self) -> Vec<ToolSpec> {
        self.exposed_routes()
            .iter()
            .map(|route| ToolSpec::from_route(route, self.describe_full_schema))
            .collect()
    }

    /// Build the current catalogue as rmcp Tool models.
    pub fn list_rmcp_tools(&self) -> Vec<Tool> {
        self.list_tools().iter().map(ToolSpec::to_tool).collect()
    }

    /// Get all tool names, in catalogue order.
    pub fn tool_names(&self) -> Vec<String> {
        self.exposed_routes()
            .iter()
            .map(|route| route.name.clone())
            .collect()
    }

    /// First exposed route carrying this tool name.
    pub fn find_route(&self, name: &str) -> Option<Arc<RouteDescriptor>> {
        self.exposed_routes()
            .into_iter()
            .find(|route| route.name == name)
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(route) = self.find_route(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        info!("Calling tool {} -> {} {}", name, route.primary_method(), route.url);
        dispatch(&route, arguments, self.executor.as_ref()).await
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("routes", &self.routes.len())
            .field("filter", &self.filter)
            .field("describe_full_schema", &self.describe_full_schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::routes::RouteDefinition;
    use crate::domains::tools::executor::{InjectedResponse, SyntheticRequest};
    use rmcp::model::RawContent;
    use serde_json::json;

    /// Echoes the request line back as the response body.
    struct EchoExecutor;

    #[async_trait::async_trait]
    impl RequestExecutor for EchoExecutor {
        async fn execute(&self, request: SyntheticRequest) -> Result<InjectedResponse, ToolError> {
            Ok(InjectedResponse::new(
                200,
                format!("{} {}", request.method, request.url),
            ))
        }
    }

    fn registry(config: ToolsConfig) -> ToolRegistry {
        let routes = Arc::new(RouteRegistry::new());
        routes.register_route(RouteDefinition::get("/hello"));
        routes.register_route(RouteDefinition::new(["HEAD"], "/hello"));
        routes.register_route(RouteDefinition::get("/hidden").hidden());
        routes.register_route(
            RouteDefinition::get("/users/:id")
                .schema(json!({"params": {"properties": {"id": {"type": "integer"}}}})),
        );
        routes.register_route(RouteDefinition::post("/users/:id").tool_name("GET__hello"));

        let filter = RouteFilter::new(&config);
        ToolRegistry::new(routes, filter, Arc::new(EchoExecutor), &config)
    }

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry(ToolsConfig::default());
        assert_eq!(
            registry.tool_names(),
            vec!["GET__hello", "GET__users_:id", "GET__hello"]
        );
    }

    #[test]
    fn test_hidden_route_never_listed() {
        let config = ToolsConfig {
            skip_head_routes: false,
            skip_options_routes: false,
            ..ToolsConfig::default()
        };
        let registry = registry(config);

        let names = registry.tool_names();
        assert!(names.contains(&"HEAD__hello".to_string()));
        assert!(!names.iter().any(|n| n.contains("hidden")));
    }

    #[test]
    fn test_rmcp_tools_match_specs() {
        let registry = registry(ToolsConfig::default());
        let tools = registry.list_rmcp_tools();
        assert_eq!(tools.len(), registry.list_tools().len());
        assert_eq!(tools[1].name, "GET__users_:id");
    }

    #[tokio::test]
    async fn test_call_substitutes_path() {
        let registry = registry(ToolsConfig::default());
        let result = registry
            .call_tool("GET__users_:id", json!({"id": 5}).as_object().unwrap().clone())
            .await
            .unwrap();
        assert_eq!(text(&result), "GET /users/5");
    }

    #[tokio::test]
    async fn test_duplicate_name_resolves_to_first_match() {
        let registry = registry(ToolsConfig::default());
        let result = registry.call_tool("GET__hello", Map::new()).await.unwrap();
        assert_eq!(text(&result), "GET /hello");
    }

    #[tokio::test]
    async fn test_call_unknown() {
        let registry = registry(ToolsConfig::default());
        let result = registry.call_tool("unknown", Map::new()).await;
        assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "unknown"));
    }
}
