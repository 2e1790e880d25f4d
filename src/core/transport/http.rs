//! HTTP transport implementation.
//!
//! Two message flows are supported, selected by [`TransportMode`]:
//!
//! - **SSE**: `GET {mount}/sse` opens a session stream whose first event
//!   names the endpoint to post to; `POST {mount}/messages?sessionId=...`
//!   feeds the session and the response comes back on the stream.
//! - **Stateless**: `POST {mount}` carries one JSON-RPC message and gets the
//!   response in the HTTP body.
//!
//! `GET {mount}/health` is always served, `GET {mount}/tools` on request.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{
        IntoResponse, Response, Sse,
        sse::{Event, KeepAlive},
    },
    routing::{get, post},
};
use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use super::config::{HttpConfig, TransportMode};
use super::rpc::{JsonRpcRequest, JsonRpcResponse, process_request};
use super::session::{SessionError, SessionManager};
use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// Interval between SSE keep-alive comments.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    sessions: Arc<SessionManager>,
    /// Normalized mount path, used to build the session endpoint URL.
    mount_path: Arc<str>,
}

/// Query string of the message ingress.
#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve the application router, MCP endpoints included.
    pub async fn run(self, mut app: Router) -> TransportResult<()> {
        let addr = self.address();

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }
        app = app.layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        let mount = self.config.normalized_mount_path();
        info!(
            "Ready - listening on {} ({:?} mode, CORS {})",
            addr, self.config.mode, cors_status
        );
        match self.config.mode {
            TransportMode::Sse => {
                info!("  → Stream:   GET {}/sse", mount);
                info!("  → Messages: POST {}/messages?sessionId=...", mount);
            }
            TransportMode::Stateless => info!("  → JSON-RPC: POST {}", mount_root(&mount)),
        }
        info!("  → Health:   GET {}/health", mount);

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the MCP endpoints for the given server.
pub fn mcp_routes(server: McpServer, sessions: Arc<SessionManager>, config: &HttpConfig) -> Router {
    let mount = config.normalized_mount_path();

    let state = AppState {
        server,
        sessions,
        mount_path: Arc::from(mount.as_str()),
    };

    let mut router = Router::new().route(&format!("{}/health", mount), get(health_check));

    router = match config.mode {
        TransportMode::Sse => router
            .route(&format!("{}/sse", mount), get(handle_sse))
            .route(&format!("{}/messages", mount), post(handle_message)),
        TransportMode::Stateless => router.route(mount_root(&mount), post(handle_stateless)),
    };

    if config.debug_tools_endpoint {
        router = router.route(&format!("{}/tools", mount), get(handle_tools));
    }

    router.with_state(state)
}

fn mount_root(mount: &str) -> &str {
    if mount.is_empty() { "/" } else { mount }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "sessions": state.sessions.len()
    }))
}

/// Debug view of the current catalogue.
async fn handle_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.server.list_tools())
}

/// Open an SSE session.
#[instrument(skip_all)]
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = state.sessions.open();
    let endpoint = format!("{}/messages?sessionId={}", state.mount_path, session.id());
    info!("SSE client connected, endpoint {}", endpoint);

    // The session stream is owned by the response body: when the client
    // disconnects the body is dropped and the session closes with it.
    let events = stream::once(async move { Event::default().event("endpoint").data(endpoint) })
        .chain(session.map(|message| Event::default().event("message").data(message.to_string())))
        .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

/// Accept a message for an SSE session.
#[instrument(skip_all)]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id else {
        return error_body(StatusCode::BAD_REQUEST, "Missing sessionId");
    };

    if !state.sessions.contains(&session_id) {
        warn!("Message for unknown session {}", session_id);
        return error_body(StatusCode::NOT_FOUND, "Session not found");
    }

    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed message: {}", e);
            return error_body(StatusCode::BAD_REQUEST, "Invalid JSON-RPC message");
        }
    };

    let Some(response) = process_request(&state.server, request).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let message = match serde_json::to_value(&response) {
        Ok(message) => message,
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    match state.sessions.deliver(&session_id, message) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(SessionError::NotFound(_)) => error_body(StatusCode::NOT_FOUND, "Session not found"),
        Err(e) => {
            error!("Failed to deliver response: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Process one JSON-RPC message and answer in the body.
#[instrument(skip_all)]
async fn handle_stateless(State(state): State<AppState>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed message: {}", e);
            return rpc_body(StatusCode::BAD_REQUEST, &JsonRpcResponse::parse_error());
        }
    };

    match process_request(&state.server, request).await {
        Some(response) => rpc_body(StatusCode::OK, &response),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

// ============================================================================
// Response helpers
// ============================================================================

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Serialize a JSON-RPC response, falling back to a 500 envelope.
fn rpc_body(status: StatusCode, response: &JsonRpcResponse) -> Response {
    match serde_json::to_vec(response) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            let envelope = json!({
                "jsonrpc": "2.0",
                "error": { "code": -32603, "message": "Internal server error" },
                "id": null
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
        }
    }
}
