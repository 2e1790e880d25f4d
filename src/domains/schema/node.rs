//! Typed view over JSON-Schema fragments.
//!
//! Route schemas arrive as arbitrary JSON. [`SchemaNode`] classifies a
//! fragment once so that type inference and example synthesis can match on
//! it exhaustively instead of probing the raw value.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Type tags
// ============================================================================

/// The JSON-Schema type tag inferred for a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Any other explicit `type` value (e.g. `"null"`).
    Other(String),
}

impl SchemaType {
    /// Parse a `type` keyword value.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Other(other.to_string()),
        }
    }

    /// The keyword as it appears in a schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(keyword) => keyword,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchemaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Schema nodes
// ============================================================================

/// Annotations shared by every scalar node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default: Option<Value>,
}

impl Annotations {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            description: object
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            example: object.get("example").cloned(),
            default: object.get("default").cloned(),
        }
    }
}

/// A classified schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String(Annotations),
    Number(Annotations),
    Integer(Annotations),
    Boolean(Annotations),
    Array {
        annotations: Annotations,
        items: Option<Box<SchemaNode>>,
    },
    Object {
        annotations: Annotations,
        /// `None` when the fragment declares no `properties` keyword.
        properties: Option<Vec<(String, SchemaNode)>>,
        required: Vec<String>,
    },
    /// A `$ref` pointer that was not (or could not be) resolved.
    Reference(String),
    /// Anything else. Keeps an explicit but unrecognized `type` keyword.
    Unknown {
        type_name: Option<String>,
        annotations: Annotations,
    },
}

impl SchemaNode {
    /// Classify a JSON value.
    ///
    /// Precedence follows type inference: a `$ref` wins, then an explicit
    /// `type`, then the presence of `properties`, then `items`.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown {
                type_name: None,
                annotations: Annotations::default(),
            };
        };

        if let Some(pointer) = object.get("$ref").and_then(Value::as_str) {
            return Self::Reference(pointer.to_string());
        }

        let annotations = Annotations::from_object(object);

        match explicit_type(object) {
            Some(SchemaType::String) => Self::String(annotations),
            Some(SchemaType::Number) => Self::Number(annotations),
            Some(SchemaType::Integer) => Self::Integer(annotations),
            Some(SchemaType::Boolean) => Self::Boolean(annotations),
            Some(SchemaType::Array) => Self::array(object, annotations),
            Some(SchemaType::Object) => Self::object(object, annotations),
            Some(SchemaType::Other(name)) => Self::Unknown {
                type_name: Some(name),
                annotations,
            },
            None if object.contains_key("properties") => Self::object(object, annotations),
            None if object.contains_key("items") => Self::array(object, annotations),
            None => Self::Unknown {
                type_name: None,
                annotations,
            },
        }
    }

    fn array(object: &Map<String, Value>, annotations: Annotations) -> Self {
        Self::Array {
            annotations,
            items: object
                .get("items")
                .map(|items| Box::new(Self::from_value(items))),
        }
    }

    fn object(object: &Map<String, Value>, annotations: Annotations) -> Self {
        let properties = object.get("properties").and_then(Value::as_object).map(|props| {
            props
                .iter()
                .map(|(key, value)| (key.clone(), Self::from_value(value)))
                .collect()
        });

        let required = object
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self::Object {
            annotations,
            properties,
            required,
        }
    }

    /// The node's annotations, if it carries any.
    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            Self::String(a) | Self::Number(a) | Self::Integer(a) | Self::Boolean(a) => Some(a),
            Self::Array { annotations, .. }
            | Self::Object { annotations, .. }
            | Self::Unknown { annotations, .. } => Some(annotations),
            Self::Reference(_) => None,
        }
    }

    /// The node's `description`, if declared.
    pub fn description(&self) -> Option<&str> {
        self.annotations()
            .and_then(|a| a.description.as_deref())
    }
}

/// Read the `type` keyword. A type union takes its first string member.
fn explicit_type(object: &Map<String, Value>) -> Option<SchemaType> {
    match object.get("type")? {
        Value::String(keyword) => Some(SchemaType::from_keyword(keyword)),
        Value::Array(keywords) => keywords
            .iter()
            .find_map(Value::as_str)
            .map(SchemaType::from_keyword),
        _ => None,
    }
}

// ============================================================================
// Type inference
// ============================================================================

/// Infer the type tag of an optional schema node.
///
/// An absent node, a reference and an untyped node all default to `string`.
pub fn infer_type(node: Option<&SchemaNode>) -> SchemaType {
    match node {
        None => SchemaType::String,
        Some(SchemaNode::String(_)) => SchemaType::String,
        Some(SchemaNode::Number(_)) => SchemaType::Number,
        Some(SchemaNode::Integer(_)) => SchemaType::Integer,
        Some(SchemaNode::Boolean(_)) => SchemaType::Boolean,
        Some(SchemaNode::Array { .. }) => SchemaType::Array,
        Some(SchemaNode::Object { .. }) => SchemaType::Object,
        Some(SchemaNode::Unknown {
            type_name: Some(name),
            ..
        }) => SchemaType::Other(name.clone()),
        Some(SchemaNode::Unknown { type_name: None, .. }) | Some(SchemaNode::Reference(_)) => {
            SchemaType::String
        }
    }
}

// ============================================================================
// Example synthesis
// ============================================================================

/// Synthesize an example value for an optional schema node.
///
/// Returns `None` for type tags with no sensible placeholder.
pub fn synthesize_example(node: Option<&SchemaNode>) -> Option<Value> {
    let annotated = |fallback: Value| {
        let annotations = node.and_then(SchemaNode::annotations);
        annotations
            .and_then(|a| a.example.clone().or_else(|| a.default.clone()))
            .unwrap_or(fallback)
    };

    match infer_type(node) {
        SchemaType::String => Some(annotated(Value::String("string".to_string()))),
        SchemaType::Number | SchemaType::Integer => Some(annotated(Value::from(0))),
        SchemaType::Boolean => Some(annotated(Value::Bool(false))),
        SchemaType::Array => match node {
            Some(SchemaNode::Array {
                items: Some(items), ..
            }) => Some(Value::Array(vec![
                synthesize_example(Some(items)).unwrap_or(Value::Null),
            ])),
            _ => Some(Value::Array(Vec::new())),
        },
        SchemaType::Object => match node {
            Some(SchemaNode::Object {
                properties: Some(properties),
                ..
            }) => Some(Value::Object(
                properties
                    .iter()
                    .filter_map(|(key, property)| {
                        synthesize_example(Some(property)).map(|example| (key.clone(), example))
                    })
                    .collect(),
            )),
            _ => Some(Value::Object(Map::new())),
        },
        SchemaType::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        SchemaNode::from_value(&value)
    }

    #[test]
    fn test_infer_type_absent_defaults_to_string() {
        assert_eq!(infer_type(None), SchemaType::String);
    }

    #[test]
    fn test_infer_type_precedence() {
        assert_eq!(infer_type(Some(&node(json!({"type": "integer"})))), SchemaType::Integer);
        // explicit type wins over structural hints
        assert_eq!(
            infer_type(Some(&node(json!({"type": "string", "properties": {}})))),
            SchemaType::String
        );
        assert_eq!(infer_type(Some(&node(json!({"properties": {}})))), SchemaType::Object);
        assert_eq!(infer_type(Some(&node(json!({"items": {}})))), SchemaType::Array);
        assert_eq!(infer_type(Some(&node(json!({"description": "x"})))), SchemaType::String);
    }

    #[test]
    fn test_infer_type_keeps_unrecognized_keyword() {
        let tag = infer_type(Some(&node(json!({"type": "null"}))));
        assert_eq!(tag, SchemaType::Other("null".to_string()));
        assert_eq!(tag.to_string(), "null");
    }

    #[test]
    fn test_infer_type_union_takes_first_member() {
        let tag = infer_type(Some(&node(json!({"type": ["number", "null"]}))));
        assert_eq!(tag, SchemaType::Number);
    }

    #[test]
    fn test_example_prefers_example_then_default() {
        let with_example = node(json!({"type": "string", "example": "hi", "default": "d"}));
        assert_eq!(synthesize_example(Some(&with_example)), Some(json!("hi")));

        let with_default = node(json!({"type": "integer", "default": 7}));
        assert_eq!(synthesize_example(Some(&with_default)), Some(json!(7)));
    }

    #[test]
    fn test_example_placeholders() {
        assert_eq!(synthesize_example(None), Some(json!("string")));
        assert_eq!(synthesize_example(Some(&node(json!({"type": "number"})))), Some(json!(0)));
        assert_eq!(
            synthesize_example(Some(&node(json!({"type": "boolean"})))),
            Some(json!(false))
        );
        assert_eq!(synthesize_example(Some(&node(json!({"type": "null"})))), None);
    }

    #[test]
    fn test_example_nested_structures() {
        let schema = node(json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "example": 42},
                "tags": {"type": "array", "items": {"type": "string"}},
                "empty": {"type": "array"},
                "skipped": {"type": "null"}
            }
        }));

        assert_eq!(
            synthesize_example(Some(&schema)),
            Some(json!({"id": 42, "tags": ["string"], "empty": []}))
        );
        assert_eq!(
            synthesize_example(Some(&node(json!({"type": "object"})))),
            Some(json!({}))
        );
    }

    #[test]
    fn test_object_required_and_description() {
        let schema = node(json!({
            "type": "object",
            "properties": {"authorization": {"type": "string", "description": "Bearer token"}},
            "required": ["authorization"]
        }));

        let SchemaNode::Object {
            properties: Some(properties),
            required,
            ..
        } = schema
        else {
            panic!("expected object node");
        };
        assert_eq!(required, vec!["authorization".to_string()]);
        assert_eq!(properties[0].1.description(), Some("Bearer token"));
    }

    #[test]
    fn test_reference_node() {
        assert_eq!(
            node(json!({"$ref": "#/definitions/User"})),
            SchemaNode::Reference("#/definitions/User".to_string())
        );
    }
}
