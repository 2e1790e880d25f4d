//! Schema domain module.
//!
//! Pure helpers over JSON-Schema fragments: reference resolution, type
//! inference and example synthesis. Nothing in here depends on the rest of
//! the crate.

mod node;
mod resolver;

pub use node::{Annotations, SchemaNode, SchemaType, infer_type, synthesize_example};
pub use resolver::resolve_references;
