//! In-process request execution against the application router.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, header};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tower::ServiceExt;
use tracing::debug;

use crate::domains::tools::{
    InjectedResponse, RequestExecutor, SyntheticRequest, ToolError, value_to_string,
};

/// Runs synthetic requests through a clone of the application router.
///
/// Nothing touches the network: the router is called as a tower service.
#[derive(Clone, Debug)]
pub struct RouterExecutor {
    router: Router,
}

impl RouterExecutor {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl RequestExecutor for RouterExecutor {
    async fn execute(&self, request: SyntheticRequest) -> Result<InjectedResponse, ToolError> {
        let http_request = build_request(&request)?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .unwrap_or_else(|never| match never {});

        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?
            .to_bytes();

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(InjectedResponse::new(
            status,
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}

/// Turn a synthetic request into an HTTP request.
fn build_request(request: &SyntheticRequest) -> Result<Request<Body>, ToolError> {
    let uri = with_query(&request.url, &request.query)?;

    let mut builder = Request::builder()
        .method(request.method.to_http())
        .uri(uri);

    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value_to_string(value));
    }

    let body = match &request.body {
        Some(payload) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            let bytes = serde_json::to_vec(payload)
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
            Body::from(bytes)
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Append query arguments to a URL. Arrays repeat the key; nulls are dropped.
fn with_query(url: &str, query: &Map<String, Value>) -> Result<String, ToolError> {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.as_str(), value_to_string(item))));
            }
            other => pairs.push((key.as_str(), value_to_string(other))),
        }
    }

    if pairs.is_empty() {
        return Ok(url.to_string());
    }

    let encoded =
        serde_urlencoded::to_string(&pairs).map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
    let separator = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", url, separator, encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::routes::HttpMethod;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, extract::RawQuery};
    use serde_json::json;

    fn request(method: HttpMethod, url: &str) -> SyntheticRequest {
        SyntheticRequest {
            method,
            url: url.to_string(),
            query: Map::new(),
            headers: Map::new(),
            body: None,
        }
    }

    #[test]
    fn test_with_query() {
        let query = json!({"q": "a b", "tag": ["x", "y"], "skip": null, "n": 3});
        let url = with_query("/search", query.as_object().unwrap()).unwrap();
        assert_eq!(url, "/search?q=a+b&tag=x&tag=y&n=3");

        assert_eq!(with_query("/plain", &Map::new()).unwrap(), "/plain");
        let url = with_query("/a?b=1", json!({"c": true}).as_object().unwrap()).unwrap();
        assert_eq!(url, "/a?b=1&c=true");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut req = request(HttpMethod::Get, "/");
        req.headers.insert("bad header".to_string(), json!("x"));
        assert!(matches!(
            build_request(&req),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_forwards_query_headers_and_body() {
        let router = Router::new()
            .route(
                "/echo",
                post(|headers: HeaderMap, RawQuery(query): RawQuery, Json(body): Json<Value>| async move {
                    Json(json!({
                        "query": query,
                        "token": headers.get("x-token").and_then(|v| v.to_str().ok()),
                        "body": body
                    }))
                }),
            )
            .route("/missing", get(|| async { (http::StatusCode::NOT_FOUND, "nope") }));
        let executor = RouterExecutor::new(router);

        let mut req = request(HttpMethod::Post, "/echo");
        req.query.insert("page".to_string(), json!(2));
        req.headers.insert("x-token".to_string(), json!("abc"));
        req.body = Some(json!({"name": "Rex"}));

        let response = executor.execute(req).await.unwrap();
        assert_eq!(response.status, 200);
        let echoed: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            echoed,
            json!({"query": "page=2", "token": "abc", "body": {"name": "Rex"}})
        );

        let response = executor
            .execute(request(HttpMethod::Get, "/missing"))
            .await
            .unwrap();
        assert_eq!(response, InjectedResponse::new(404, "nope"));
    }
}
