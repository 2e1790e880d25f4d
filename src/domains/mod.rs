//! Domains module containing the route-to-tool translation logic.
//!
//! - **schema**: reference resolution, type inference, example synthesis
//! - **routes**: route registration and filtering
//! - **tools**: tool specs, the catalogue, and tool-call dispatch

pub mod routes;
pub mod schema;
pub mod tools;
