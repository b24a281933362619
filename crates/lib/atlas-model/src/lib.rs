//! Response envelope and info models for atlas-mcp.
//!
//! This crate defines the uniform tool response shape and the data models
//! shared by the operation layer and the MCP surface.

pub mod envelope;
pub mod models;

pub use envelope::*;
pub use models::*;

/// JSON object as carried across the MCP boundary.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
