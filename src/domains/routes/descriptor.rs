//! Route descriptor types.
//!
//! A [`RouteDefinition`] is what the web framework hands over when a route
//! is registered. The registry turns it into an immutable
//! [`RouteDescriptor`] with every schema group already resolved.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// HTTP methods
// ============================================================================

/// The HTTP methods a route may be exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Patch,
    Post,
    Put,
    Options,
}

impl HttpMethod {
    /// Parse a method name, ignoring case. Returns `None` for anything
    /// outside the recognized vocabulary.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "DELETE" => Some(Self::Delete),
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "PATCH" => Some(Self::Patch),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Options => "OPTIONS",
        }
    }

    /// Convert into the `http` crate's method type.
    pub fn to_http(self) -> http::Method {
        match self {
            Self::Delete => http::Method::DELETE,
            Self::Get => http::Method::GET,
            Self::Head => http::Method::HEAD,
            Self::Patch => http::Method::PATCH,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Options => http::Method::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Registration payload
// ============================================================================

/// Per-route MCP options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpRouteConfig {
    /// Keep the route out of the tool catalogue entirely.
    #[serde(default)]
    pub hide: bool,

    /// Tool name override.
    #[serde(default)]
    pub name: Option<String>,

    /// Replaces the schema's `description` in the tool description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route as announced by the web framework at registration time.
///
/// `schema` is the route's JSON-Schema-shaped configuration object with the
/// optional keys `operationId`, `summary`, `description`, `tags`, `headers`,
/// `params`, `querystring`, `body` and `response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub methods: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub mcp: McpRouteConfig,
}

impl RouteDefinition {
    /// Create a definition for one or more methods.
    pub fn new<I, S>(methods: I, url: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
            url: url.into(),
            schema: Value::Null,
            mcp: McpRouteConfig::default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(["GET"], url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(["POST"], url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(["PUT"], url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(["PATCH"], url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(["DELETE"], url)
    }

    /// Attach the route's schema object.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// Hide the route from the tool catalogue.
    pub fn hidden(mut self) -> Self {
        self.mcp.hide = true;
        self
    }

    /// Override the generated tool name.
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.mcp.name = Some(name.into());
        self
    }

    /// Override the schema description used for the tool.
    pub fn tool_description(mut self, description: impl Into<String>) -> Self {
        self.mcp.description = Some(description.into());
        self
    }
}

// ============================================================================
// Resolved descriptor
// ============================================================================

/// A registered route, ready to be turned into a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDescriptor {
    /// Recognized methods in declaration order. Never empty.
    pub methods: Vec<HttpMethod>,
    pub url: String,
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub headers: Value,
    pub params: Value,
    pub query: Value,
    pub body: Value,
    pub response: Option<Value>,
}

impl RouteDescriptor {
    /// The method used when dispatching a tool call.
    pub fn primary_method(&self) -> HttpMethod {
        self.methods.first().copied().unwrap_or(HttpMethod::Get)
    }

    pub fn has_method(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }
}
