//! Request execution seam.
//!
//! Tool calls are turned into synthetic HTTP requests and handed to a
//! [`RequestExecutor`]. The framework integration provides the real
//! implementation; tests plug in recording fakes.

use serde_json::{Map, Value};

use super::error::ToolError;
use crate::domains::routes::HttpMethod;

/// A request built from tool-call arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRequest {
    pub method: HttpMethod,
    /// URL with every path placeholder substituted.
    pub url: String,
    pub query: Map<String, Value>,
    pub headers: Map<String, Value>,
    /// `None` when no argument landed in the body bucket.
    pub body: Option<Value>,
}

/// Raw outcome of an injected request.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectedResponse {
    pub status: u16,
    pub body: String,
}

impl InjectedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status signals a client or server error.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Executes synthetic requests against the web framework.
#[async_trait::async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: SyntheticRequest) -> Result<InjectedResponse, ToolError>;
}

/// Render an argument value the way it appears in a URL or header.
///
/// Strings are used verbatim; everything else uses its JSON form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
