//! Tool Converter - derives MCP tool specifications from route descriptors.
//!
//! Tool specs are a view over the registry and are rebuilt on every
//! catalogue request.

use rmcp::model::Tool;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::domains::routes::RouteDescriptor;
use crate::domains::schema::{SchemaNode, infer_type, synthesize_example};

/// A tool as presented to MCP clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
}

impl ToolSpec {
    /// Build the spec for a route.
    pub fn from_route(route: &RouteDescriptor, describe_full_schema: bool) -> Self {
        Self {
            name: route.name.clone(),
            description: build_description(route, describe_full_schema),
            input_schema: build_input_schema(route),
        }
    }

    /// Create an rmcp Tool model for this spec.
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema.clone()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

// ============================================================================
// Description
// ============================================================================

/// Compose the markdown description of a route's tool.
///
/// Falls back to the tool name when the route documents nothing.
pub fn build_description(route: &RouteDescriptor, describe_full_schema: bool) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(summary) = &route.summary {
        sections.push(summary.clone());
    }
    if let Some(description) = &route.description {
        sections.push(description.clone());
    }
    if !route.tags.is_empty() {
        sections.push(format!("Tags: {}", route.tags.join(", ")));
    }

    if describe_full_schema {
        if let Some(response) = &route.response {
            let node = SchemaNode::from_value(response);
            if let Some(example) = synthesize_example(Some(&node)) {
                sections.push(format!("Example response:\n{}", json_block(&example)));
            }
            sections.push(format!("Response schema:\n{}", json_block(response)));
        }
    }

    sections.retain(|section| !section.trim().is_empty());
    if sections.is_empty() {
        return route.name.clone();
    }
    sections.join("\n\n")
}

fn json_block(value: &Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!("```json\n{}\n```", pretty)
}

// ============================================================================
// Input schema
// ============================================================================

/// The parameter groups of a route, in merge order.
#[derive(Debug, Clone, Copy)]
enum ParamGroup {
    Header,
    Path,
    Query,
    Body,
}

impl ParamGroup {
    fn describe(self, key: &str, node: &SchemaNode) -> String {
        match self {
            Self::Header => node
                .description()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Header: {}", key)),
            Self::Path => format!("Path parameter: {}", key),
            Self::Query => format!("Query parameter: {}", key),
            Self::Body => format!("Body parameter: {}", key),
        }
    }
}

/// Merge every parameter group of a route into one flat object schema.
///
/// Groups are merged headers, path, query, body: a key declared in several
/// groups keeps the definition of the last one.
pub fn build_input_schema(route: &RouteDescriptor) -> Map<String, Value> {
    let groups = [
        (&route.headers, ParamGroup::Header),
        (&route.params, ParamGroup::Path),
        (&route.query, ParamGroup::Query),
        (&route.body, ParamGroup::Body),
    ];

    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for (schema, group) in groups {
        let SchemaNode::Object {
            properties: Some(declared),
            required: group_required,
            ..
        } = SchemaNode::from_value(schema)
        else {
            continue;
        };

        for (key, node) in &declared {
            properties.insert(
                key.clone(),
                json!({
                    "type": infer_type(Some(node)),
                    "title": key,
                    "description": group.describe(key, node),
                }),
            );

            if group_required.contains(key) && !required.contains(key) {
                required.push(key.clone());
            }
        }
    }

    let mut input_schema = Map::new();
    input_schema.insert("type".to_string(), json!("object"));
    input_schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        input_schema.insert("required".to_string(), json!(required));
    }
    input_schema.insert(
        "title".to_string(),
        json!(format!("{}Parameters", route.name)),
    );
    input_schema
}
