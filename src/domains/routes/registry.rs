//! Route Registry - ordered store of every route registered with the bridge.
//!
//! Registration is synchronous and happens in the order the framework
//! declares routes. Descriptors are resolved once, on insertion, and are
//! shared out as `Arc`s afterwards.

use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

use super::descriptor::{HttpMethod, RouteDefinition, RouteDescriptor};
use crate::domains::schema::resolve_references;

/// Status keys tried, in order, when picking the response schema.
const RESPONSE_KEYS: &[&str] = &["200", "201", "2XX", "2xx", "default"];

/// Registry of resolved route descriptors.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: RwLock<Vec<Arc<RouteDescriptor>>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route announced by the web framework.
    ///
    /// Hidden routes and routes without a recognized method are dropped
    /// without error.
    pub fn register_route(&self, definition: RouteDefinition) {
        if definition.mcp.hide {
            debug!("Skipping hidden route: {}", definition.url);
            return;
        }

        let name = tool_name(&definition);

        let methods: Vec<HttpMethod> = definition
            .methods
            .iter()
            .filter_map(|method| HttpMethod::parse(method))
            .collect();
        if methods.is_empty() {
            debug!(
                "Skipping route {} with no recognized method ({:?})",
                definition.url, definition.methods
            );
            return;
        }

        let schema = &definition.schema;
        let descriptor = RouteDescriptor {
            methods,
            name,
            summary: string_field(schema, "summary"),
            description: definition
                .mcp
                .description
                .clone()
                .or_else(|| string_field(schema, "description")),
            tags: schema
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            headers: resolve_group(schema, "headers"),
            params: resolve_group(schema, "params"),
            query: resolve_group(schema, "querystring"),
            body: resolve_group(schema, "body"),
            response: response_schema(schema).map(|fragment| resolve_references(fragment, schema)),
            url: definition.url,
        };

        info!(
            "Registered tool {} for {} {}",
            descriptor.name,
            descriptor.primary_method(),
            descriptor.url
        );

        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(descriptor));
    }

    /// Snapshot of all registered routes, in registration order.
    pub fn routes(&self) -> Vec<Arc<RouteDescriptor>> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.routes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Tool name precedence: explicit override, then `operationId`, then a slug
/// built from the first declared method and the URL.
fn tool_name(definition: &RouteDefinition) -> String {
    if let Some(name) = &definition.mcp.name {
        return name.clone();
    }

    if let Some(operation_id) = string_field(&definition.schema, "operationId") {
        return operation_id;
    }

    let method = definition
        .methods
        .first()
        .map(|m| m.to_ascii_uppercase())
        .unwrap_or_default();
    format!("{}_{}", method, definition.url.replace('/', "_"))
}

fn string_field(schema: &Value, key: &str) -> Option<String> {
    schema
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn resolve_group(schema: &Value, key: &str) -> Value {
    schema
        .get(key)
        .map(|group| resolve_references(group, schema))
        .unwrap_or(Value::Null)
}

/// Pick the success response schema out of the `response` map.
fn response_schema(schema: &Value) -> Option<&Value> {
    let response = schema.get("response")?;
    let map: &Map<String, Value> = response.as_object()?;

    if map.contains_key("type") || map.contains_key("properties") || map.contains_key("$ref") {
        return Some(response);
    }

    RESPONSE_KEYS
        .iter()
        .find_map(|key| map.get(*key))
        .or_else(|| map.values().next())
}
