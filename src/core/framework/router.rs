//! Route registration hook for axum.
//!
//! axum has no callback fired when a route is added, so routes that should
//! become tools are declared through [`McpRouter::route`], which mounts the
//! handler and records the definition in the same step.

use axum::Router;
use axum::routing::MethodRouter;
use std::sync::Arc;
use tracing::info;

use super::executor::RouterExecutor;
use crate::core::config::Config;
use crate::core::server::McpServer;
use crate::core::transport::{SessionManager, http::mcp_routes};
use crate::domains::routes::{RouteDefinition, RouteDescriptor, RouteFilter, RouteRegistry};
use crate::domains::tools::ToolRegistry;

/// Builder pairing an axum router with the route registry.
pub struct McpRouter {
    config: Config,
    router: Router,
    routes: Arc<RouteRegistry>,
    filter: RouteFilter,
}

/// A built application.
#[derive(Clone, Debug)]
pub struct McpApp {
    /// Serves the tool catalogue; shared by every transport.
    pub server: McpServer,
    /// The application routes with the MCP endpoints merged in.
    pub router: Router,
    pub sessions: Arc<SessionManager>,
}

impl McpRouter {
    pub fn new(config: Config) -> Self {
        let filter = RouteFilter::new(&config.tools);
        Self {
            config,
            router: Router::new(),
            routes: Arc::new(RouteRegistry::new()),
            filter,
        }
    }

    /// Mount a handler and register the route with the bridge.
    ///
    /// The URL uses `:name` placeholders; the axum path is derived from it.
    pub fn route(mut self, definition: RouteDefinition, method_router: MethodRouter) -> Self {
        let path = axum_path(&definition.url);
        self.router = self.router.route(&path, method_router);
        self.routes.register_route(definition);
        self
    }

    /// Merge routes that are served but never announced to the bridge.
    pub fn merge(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Install a custom route predicate. Returning `false` hides the tool.
    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RouteDescriptor) -> bool + Send + Sync + 'static,
    {
        self.filter = self.filter.with_predicate(predicate);
        self
    }

    /// Snapshot of the routes registered so far.
    ///
    /// The registry itself is not handed out: a route registered without
    /// being mounted would be listed as a tool that cannot be executed.
    pub fn routes(&self) -> Vec<Arc<RouteDescriptor>> {
        self.routes.routes()
    }

    /// Wire the registry, server and sessions together.
    pub fn build(self) -> McpApp {
        let http_config = self.config.transport.http_config();
        let config = Arc::new(self.config);

        let executor = Arc::new(RouterExecutor::new(self.router.clone()));
        let tools = ToolRegistry::new(
            Arc::clone(&self.routes),
            self.filter,
            executor,
            &config.tools,
        );
        let server = McpServer::new(Arc::clone(&config), tools);
        let sessions = Arc::new(SessionManager::new());

        info!(
            "Bridge built with {} registered routes, MCP endpoints under {}",
            self.routes.len(),
            http_config.normalized_mount_path()
        );

        let router = self.router.merge(mcp_routes(
            server.clone(),
            Arc::clone(&sessions),
            &http_config,
        ));

        McpApp {
            server,
            router,
            sessions,
        }
    }
}

/// Convert a `:name` URL template into an axum path.
///
/// A bare `*` segment becomes a catch-all.
pub fn axum_path(url: &str) -> String {
    url.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else if segment == "*" {
                "{*wildcard}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::Json;
    use rmcp::model::{CallToolResult, RawContent};
    use serde_json::{Map, Value, json};

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_axum_path() {
        assert_eq!(axum_path("/hello"), "/hello");
        assert_eq!(axum_path("/users/:id"), "/users/{id}");
        assert_eq!(axum_path("/a/:x/b/:y"), "/a/{x}/b/{y}");
        assert_eq!(axum_path("/files/*"), "/files/{*wildcard}");
    }

    #[test]
    fn test_plain_route_gets_slug_name() {
        let app = McpRouter::new(Config::default())
            .route(RouteDefinition::get("/hello"), get(|| async { "Hello World" }))
            .build();

        let tools = app.server.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "GET__hello");
        assert_eq!(tools[0].description, "GET__hello");
    }

    #[test]
    fn test_operation_id_and_docs() {
        let app = McpRouter::new(Config::default())
            .route(
                RouteDefinition::get("/hello").schema(json!({
                    "operationId": "hello",
                    "summary": "Hello World",
                    "description": "Says hello"
                })),
                get(|| async { "Hello World" }),
            )
            .build();

        let tools = app.server.list_tools();
        assert_eq!(tools[0].name, "hello");
        assert_eq!(tools[0].description, "Hello World\n\nSays hello");
    }

    #[tokio::test]
    async fn test_name_override_call() {
        let app = McpRouter::new(Config::default())
            .route(
                RouteDefinition::get("/hello")
                    .schema(json!({"operationId": "hello"}))
                    .tool_name("my_hello"),
                get(|| async { "Hello World" }),
            )
            .build();

        let result = app.server.call_tool("my_hello", Map::new()).await.unwrap();
        assert_eq!(text(&result), "Hello World");
        assert_eq!(result.is_error, Some(false));

        let missing = app.server.call_tool("hello", Map::new()).await;
        assert!(matches!(missing, Err(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_required_header_is_forwarded() {
        let app = McpRouter::new(Config::default())
            .route(
                RouteDefinition::get("/secure").schema(json!({
                    "operationId": "secure",
                    "headers": {
                        "type": "object",
                        "properties": {
                            "authorization": {
                                "type": "string",
                                "description": "Bearer token"
                            }
                        },
                        "required": ["authorization"]
                    }
                })),
                get(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some("Bearer ia") => (StatusCode::OK, "welcome"),
                        _ => (StatusCode::UNAUTHORIZED, "denied"),
                    }
                }),
            )
            .build();

        let tools = app.server.list_tools();
        let schema = &tools[0].input_schema;
        assert_eq!(schema["required"], json!(["authorization"]));
        assert_eq!(
            schema["properties"]["authorization"]["description"],
            "Bearer token"
        );

        let result = app
            .server
            .call_tool("secure", args(json!({"authorization": "Bearer ia"})))
            .await
            .unwrap();
        assert_eq!(text(&result), "welcome");
        assert_eq!(result.is_error, Some(false));

        let result = app.server.call_tool("secure", Map::new()).await.unwrap();
        assert_eq!(text(&result), "denied");
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_path_query_and_body_reach_handler() {
        let app = McpRouter::new(Config::default())
            .route(
                RouteDefinition::post("/pets/:id").schema(json!({
                    "operationId": "update_pet",
                    "params": {"type": "object", "properties": {"id": {"type": "integer"}}},
                    "querystring": {"type": "object", "properties": {"notify": {"type": "boolean"}}},
                    "body": {
                        "type": "object",
                        "properties": {"name": {"type": "string"}},
                        "required": ["name"]
                    }
                })),
                post(
                    |Path(id): Path<u32>,
                     axum::extract::RawQuery(query): axum::extract::RawQuery,
                     Json(body): Json<Value>| async move {
                        Json(json!({"id": id, "query": query, "name": body["name"]}))
                    },
                ),
            )
            .build();

        let result = app
            .server
            .call_tool(
                "update_pet",
                args(json!({"id": 7, "notify": true, "name": "Rex", "extra": 1})),
            )
            .await
            .unwrap();

        let body: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(body, json!({"id": 7, "query": "notify=true", "name": "Rex"}));
    }

    #[tokio::test]
    async fn test_hyphenated_path_param() {
        let app = McpRouter::new(Config::default())
            .route(
                RouteDefinition::get("/users/:user-id").schema(json!({
                    "operationId": "get_user",
                    "params": {
                        "type": "object",
                        "properties": {"user-id": {"type": "string"}}
                    }
                })),
                get(|Path(id): Path<String>| async move { id }),
            )
            .build();

        let result = app
            .server
            .call_tool("get_user", args(json!({"user-id": "42"})))
            .await
            .unwrap();
        assert_eq!(text(&result), "42");
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_routes_snapshot_tracks_mounted_routes() {
        let router = McpRouter::new(Config::default())
            .route(RouteDefinition::get("/a"), get(|| async { "a" }))
            .route(RouteDefinition::post("/b"), post(|| async { "b" }));

        let names: Vec<String> = router.routes().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["GET__a", "POST__b"]);
    }

    #[test]
    fn test_custom_filter_and_hidden_routes() {
        let app = McpRouter::new(Config::default())
            .route(RouteDefinition::get("/public"), get(|| async { "ok" }))
            .route(RouteDefinition::get("/internal"), get(|| async { "ok" }))
            .route(RouteDefinition::get("/secret").hidden(), get(|| async { "ok" }))
            .with_filter(|route| !route.url.starts_with("/internal"))
            .build();

        let names: Vec<String> = app.server.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["GET__public"]);
    }
}
