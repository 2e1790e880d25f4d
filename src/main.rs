//! Demo entry point.
//!
//! Serves a small in-memory pet store and exposes its routes as MCP tools
//! over the configured transport.

use anyhow::Result;
use axum::{
    Json,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use route_mcp::{Config, McpApp, McpRouter, RouteDefinition, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let app = build_app(config);

    info!("Serving {} tools", app.server.list_tools().len());

    serve(transport, app).await?;

    info!("Server shutting down");

    Ok(())
}

async fn serve(transport: TransportService, app: McpApp) -> route_mcp::Result<()> {
    transport.run(app).await?;
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so stdout stays free for the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// Demo application
// ============================================================================

type Store = Arc<Mutex<Vec<Value>>>;

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

fn build_app(config: Config) -> McpApp {
    let store: Store = Arc::new(Mutex::new(vec![
        json!({"id": 1, "name": "Rex", "tag": "dog"}),
        json!({"id": 2, "name": "Tom", "tag": "cat"}),
    ]));

    let pet_schema = json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer", "example": 1},
            "name": {"type": "string", "example": "Rex"},
            "tag": {"type": "string"}
        }
    });

    McpRouter::new(config)
        .route(
            RouteDefinition::get("/hello").schema(json!({
                "operationId": "hello",
                "summary": "Hello World",
                "description": "Says hello"
            })),
            get(|| async { "Hello World" }),
        )
        .route(
            RouteDefinition::get("/pets").schema(json!({
                "operationId": "list_pets",
                "summary": "List pets",
                "tags": ["pets"],
                "querystring": {
                    "type": "object",
                    "properties": {
                        "limit": {"type": "integer", "description": "Maximum number of pets"}
                    }
                },
                "response": {
                    "200": {"type": "array", "items": {"$ref": "#/definitions/pet"}}
                },
                "definitions": {"pet": pet_schema}
            })),
            get({
                let store = Arc::clone(&store);
                move |Query(query): Query<ListQuery>| async move {
                    let pets = store.lock().unwrap_or_else(PoisonError::into_inner);
                    let limit = query.limit.unwrap_or(pets.len());
                    Json(pets.iter().take(limit).cloned().collect::<Vec<_>>())
                }
            }),
        )
        .route(
            RouteDefinition::get("/pets/:id").schema(json!({
                "operationId": "get_pet",
                "summary": "Find a pet by id",
                "tags": ["pets"],
                "params": {
                    "type": "object",
                    "properties": {"id": {"type": "integer"}},
                    "required": ["id"]
                }
            })),
            get({
                let store = Arc::clone(&store);
                move |Path(id): Path<u64>| async move {
                    let pets = store.lock().unwrap_or_else(PoisonError::into_inner);
                    match pets.iter().find(|pet| pet["id"] == id) {
                        Some(pet) => (StatusCode::OK, Json(pet.clone())),
                        None => (
                            StatusCode::NOT_FOUND,
                            Json(json!({"error": format!("Pet {} not found", id)})),
                        ),
                    }
                }
            }),
        )
        .route(
            RouteDefinition::post("/pets").schema(json!({
                "operationId": "create_pet",
                "summary": "Add a pet",
                "tags": ["pets"],
                "body": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "tag": {"type": "string"}
                    },
                    "required": ["name"]
                }
            })),
            post({
                let store = Arc::clone(&store);
                move |Json(mut pet): Json<Value>| async move {
                    if !pet.is_object() {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "Expected a pet object"})),
                        );
                    }
                    let mut pets = store.lock().unwrap_or_else(PoisonError::into_inner);
                    pet["id"] = json!(pets.len() + 1);
                    pets.push(pet.clone());
                    (StatusCode::CREATED, Json(pet))
                }
            }),
        )
        .route(
            RouteDefinition::delete("/pets/:id")
                .schema(json!({
                    "operationId": "delete_pet",
                    "summary": "Remove a pet",
                    "headers": {
                        "type": "object",
                        "properties": {
                            "authorization": {"type": "string", "description": "Bearer token"}
                        },
                        "required": ["authorization"]
                    },
                    "params": {
                        "type": "object",
                        "properties": {"id": {"type": "integer"}}
                    }
                }))
                .tool_description("Remove a pet. Requires an admin token."),
            delete({
                let store = Arc::clone(&store);
                move |headers: HeaderMap, Path(id): Path<u64>| async move {
                    if headers.get("authorization").is_none() {
                        return StatusCode::UNAUTHORIZED;
                    }
                    let mut pets = store.lock().unwrap_or_else(PoisonError::into_inner);
                    pets.retain(|pet| pet["id"] != id);
                    StatusCode::NO_CONTENT
                }
            }),
        )
        .route(
            RouteDefinition::get("/internal/stats").hidden(),
            get(|| async { "internal" }),
        )
        .build()
}
