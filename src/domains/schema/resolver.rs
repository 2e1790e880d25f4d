//! `$ref` resolution for route schemas.
//!
//! References are local JSON pointers (`#/definitions/User`) evaluated
//! against the schema object of the route being registered. Resolution is
//! fail-soft: a pointer that leads nowhere, points outside the document, or
//! closes a cycle is left in place as-is.

use serde_json::Value;
use tracing::debug;

/// Recursively replace every resolvable `$ref` node in `schema` with the
/// fragment it designates in `root`.
pub fn resolve_references(schema: &Value, root: &Value) -> Value {
    let mut expanding = Vec::new();
    resolve_with(schema, root, &mut expanding)
}

fn resolve_with(schema: &Value, root: &Value, expanding: &mut Vec<String>) -> Value {
    match schema {
        Value::Object(object) => {
            if let Some(pointer) = object.get("$ref").and_then(Value::as_str) {
                return resolve_pointer(schema, pointer, root, expanding);
            }

            Value::Object(
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), resolve_with(value, root, expanding)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_with(item, root, expanding))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn resolve_pointer(
    node: &Value,
    pointer: &str,
    root: &Value,
    expanding: &mut Vec<String>,
) -> Value {
    if expanding.iter().any(|active| active == pointer) {
        debug!("Cyclic schema reference left unresolved: {}", pointer);
        return node.clone();
    }

    let Some(target) = lookup(root, pointer) else {
        debug!("Unresolvable schema reference left as-is: {}", pointer);
        return node.clone();
    };

    expanding.push(pointer.to_string());
    let resolved = resolve_with(target, root, expanding);
    expanding.pop();

    resolved
}

/// Follow a local pointer. `#` alone designates the root itself.
fn lookup<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix('#')?;
    root.pointer(path)
}
