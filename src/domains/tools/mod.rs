//! Tools domain module.
//!
//! Every tool is derived from a registered route. This module turns routes
//! into tool specs and tool calls back into requests against those routes.
//!
//! ## Architecture
//!
//! - `converter.rs` - route -> tool spec (name, description, input schema)
//! - `dispatcher.rs` - tool call -> synthetic request -> tool result
//! - `executor.rs` - the seam through which requests reach the web framework
//! - `registry.rs` - the catalogue and call-by-name entry point
//! - `error.rs` - Tool-specific error types

mod converter;
mod dispatcher;
mod error;
mod executor;
mod registry;

pub use converter::{ToolSpec, build_description, build_input_schema};
pub use dispatcher::{
    ArgumentBuckets, classify_arguments, dispatch, format_response, substitute_path,
};
pub use error::ToolError;
pub use executor::{InjectedResponse, RequestExecutor, SyntheticRequest, value_to_string};
pub use registry::ToolRegistry;
