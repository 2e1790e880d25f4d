//! Request Dispatcher - turns a tool call into a request against its route.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};
use std::cmp::Reverse;
use tracing::{debug, instrument};

use super::error::ToolError;
use super::executor::{InjectedResponse, RequestExecutor, SyntheticRequest, value_to_string};
use crate::domains::routes::RouteDescriptor;

/// Tool-call arguments split by where they go in the request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArgumentBuckets {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub headers: Map<String, Value>,
    pub body: Map<String, Value>,
}

/// Assign every argument to exactly one bucket.
///
/// Keys declared by the path-param schema win, then the query schema, then
/// the header schema; everything else is sent in the body.
pub fn classify_arguments(route: &RouteDescriptor, arguments: Map<String, Value>) -> ArgumentBuckets {
    let mut buckets = ArgumentBuckets::default();

    for (key, value) in arguments {
        let bucket = if declares(&route.params, &key) {
            &mut buckets.params
        } else if declares(&route.query, &key) {
            &mut buckets.query
        } else if declares(&route.headers, &key) {
            &mut buckets.headers
        } else {
            &mut buckets.body
        };
        bucket.insert(key, value);
    }

    buckets
}

fn declares(schema: &Value, key: &str) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|properties| properties.contains_key(key))
}

/// Replace `:key` placeholders in a URL template with URL-encoded values.
///
/// Substitution is driven by the parameter keys, so keys may contain
/// characters such as `-`. A placeholder matches a key only when the key is
/// followed by a non-identifier character or the end of the template; longer
/// keys are tried first. Placeholders without a matching parameter are left
/// untouched.
pub fn substitute_path(template: &str, params: &Map<String, Value>) -> String {
    let mut keys: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|key| !key.is_empty())
        .collect();
    keys.sort_by_key(|key| Reverse(key.len()));

    let mut url = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(offset) = rest.find(':') {
        url.push_str(&rest[..offset]);
        let after = &rest[offset + 1..];

        let matched = keys.iter().copied().find(|key| {
            after
                .strip_prefix(key)
                .is_some_and(|tail| !tail.starts_with(is_name_char))
        });

        match matched {
            Some(key) => {
                url.push_str(&urlencoding::encode(&value_to_string(&params[key])));
                rest = &after[key.len()..];
            }
            None => {
                url.push(':');
                rest = after;
            }
        }
    }

    url.push_str(rest);
    url
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Wrap a raw response body in a single text content block.
///
/// JSON bodies are pretty-printed; anything else is passed through as-is.
pub fn format_response(response: &InjectedResponse) -> CallToolResult {
    let text = match serde_json::from_str::<Value>(&response.body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.body.clone()),
        Err(_) => response.body.clone(),
    };

    if response.is_error() {
        CallToolResult::error(vec![Content::text(text)])
    } else {
        CallToolResult::success(vec![Content::text(text)])
    }
}

/// Dispatch a tool call to the route it was derived from.
#[instrument(skip_all, fields(tool = %route.name))]
pub async fn dispatch(
    route: &RouteDescriptor,
    arguments: Map<String, Value>,
    executor: &dyn RequestExecutor,
) -> Result<CallToolResult, ToolError> {
    let buckets = classify_arguments(route, arguments);

    let request = SyntheticRequest {
        method: route.primary_method(),
        url: substitute_path(&route.url, &buckets.params),
        query: buckets.query,
        headers: buckets.headers,
        body: (!buckets.body.is_empty()).then(|| Value::Object(buckets.body)),
    };

    debug!("Injecting {} {}", request.method, request.url);
    let response = executor.execute(request).await?;
    debug!("Route responded with status {}", response.status);

    Ok(format_response(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::routes::{HttpMethod, RouteDefinition, RouteRegistry};
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records the last request and answers with a canned response.
    struct RecordingExecutor {
        last: Mutex<Option<SyntheticRequest>>,
        response: InjectedResponse,
    }

    impl RecordingExecutor {
        fn new(response: InjectedResponse) -> Self {
            Self {
                last: Mutex::new(None),
                response,
            }
        }

        fn last(&self) -> SyntheticRequest {
            self.last.lock().unwrap().clone().expect("no request recorded")
        }
    }

    #[async_trait::async_trait]
    impl RequestExecutor for RecordingExecutor {
        async fn execute(&self, request: SyntheticRequest) -> Result<InjectedResponse, ToolError> {
            *self.last.lock().unwrap() = Some(request);
            Ok(self.response.clone())
        }
    }

    fn user_route() -> Arc<RouteDescriptor> {
        let registry = RouteRegistry::new();
        registry.register_route(
            RouteDefinition::new(["PATCH", "PUT"], "/orgs/:org/users/:id").schema(json!({
                "headers": {"type": "object", "properties": {"authorization": {"type": "string"}}},
                "params": {"type": "object", "properties": {
                    "org": {"type": "string"}, "id": {"type": "integer"}
                }},
                "querystring": {"type": "object", "properties": {"dryRun": {"type": "boolean"}}},
                "body": {"type": "object", "properties": {"name": {"type": "string"}}}
            })),
        );
        registry.routes().remove(0)
    }

    fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_classification_is_total_and_exclusive() {
        let route = user_route();
        let arguments = json!({
            "org": "acme",
            "id": 7,
            "dryRun": true,
            "authorization": "Bearer x",
            "name": "Ada",
            "undeclared": [1, 2]
        });
        let arguments = arguments.as_object().unwrap().clone();
        let total = arguments.len();

        let buckets = classify_arguments(&route, arguments);

        assert_eq!(buckets.params.keys().collect::<Vec<_>>(), vec!["org", "id"]);
        assert_eq!(buckets.query.keys().collect::<Vec<_>>(), vec!["dryRun"]);
        assert_eq!(buckets.headers.keys().collect::<Vec<_>>(), vec!["authorization"]);
        assert_eq!(buckets.body.keys().collect::<Vec<_>>(), vec!["name", "undeclared"]);
        assert_eq!(
            buckets.params.len() + buckets.query.len() + buckets.headers.len() + buckets.body.len(),
            total
        );
    }

    #[test]
    fn test_path_param_beats_query_declaration() {
        let registry = RouteRegistry::new();
        registry.register_route(RouteDefinition::get("/items/:id").schema(json!({
            "params": {"properties": {"id": {"type": "string"}}},
            "querystring": {"properties": {"id": {"type": "string"}}}
        })));
        let route = registry.routes().remove(0);

        let buckets = classify_arguments(&route, json!({"id": "1"}).as_object().unwrap().clone());
        assert!(buckets.params.contains_key("id"));
        assert!(buckets.query.is_empty());
    }

    #[test]
    fn test_substitute_path() {
        let params = json!({"org": "acme corp", "id": 7, "i": "x"});
        let params = params.as_object().unwrap();

        assert_eq!(
            substitute_path("/orgs/:org/users/:id", params),
            "/orgs/acme%20corp/users/7"
        );
        // placeholder names are matched whole
        assert_eq!(substitute_path("/:id-:i/:missing", params), "/7-x/:missing");
        assert_eq!(substitute_path("/plain", params), "/plain");
    }

    #[test]
    fn test_substitute_path_with_hyphenated_keys() {
        let params = json!({"user": "u", "user-id": "42", "post_id": 3});
        let params = params.as_object().unwrap();

        assert_eq!(substitute_path("/users/:user-id", params), "/users/42");
        assert_eq!(
            substitute_path("/:user/:user-id/posts/:post_id.json", params),
            "/u/42/posts/3.json"
        );
        // a key is not matched inside a longer name
        assert_eq!(substitute_path("/:post_idx", params), "/:post_idx");
    }

    #[test]
    fn test_format_json_body_is_pretty_printed() {
        let result = format_response(&InjectedResponse::new(200, r#"{"hello":"world"}"#));
        assert_eq!(text(&result), "{\n  \"hello\": \"world\"\n}");
        assert_ne!(result.is_error, Some(true));
    }

    #[test]
    fn test_format_raw_body_is_unchanged() {
        let result = format_response(&InjectedResponse::new(200, "Hello World"));
        assert_eq!(result.content.len(), 1);
        assert_eq!(text(&result), "Hello World");
    }

    #[test]
    fn test_format_error_status_marks_result() {
        let result = format_response(&InjectedResponse::new(404, "Not Found"));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "Not Found");
    }

    #[tokio::test]
    async fn test_dispatch_builds_request() {
        let route = user_route();
        let executor = RecordingExecutor::new(InjectedResponse::new(200, "[1,2]"));

        let arguments = json!({
            "org": "acme", "id": 7, "dryRun": true, "authorization": "Bearer x", "name": "Ada"
        });
        let result = dispatch(&route, arguments.as_object().unwrap().clone(), &executor)
            .await
            .unwrap();

        let request = executor.last();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.url, "/orgs/acme/users/7");
        assert_eq!(request.query, json!({"dryRun": true}).as_object().unwrap().clone());
        assert_eq!(request.headers["authorization"], "Bearer x");
        assert_eq!(request.body, Some(json!({"name": "Ada"})));
        assert_eq!(text(&result), "[\n  1,\n  2\n]");
    }

    #[tokio::test]
    async fn test_dispatch_omits_empty_body() {
        let route = user_route();
        let executor = RecordingExecutor::new(InjectedResponse::new(204, ""));

        let result = dispatch(&route, Map::new(), &executor).await;
        tokio_test::assert_ok!(&result);
        assert_eq!(executor.last().body, None);
        assert_eq!(executor.last().url, "/orgs/:org/users/:id");
    }
}
