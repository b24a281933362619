//! Connection manager and database operations for atlas-mcp.
//!
//! This crate owns the single MongoDB connection handle, resolves database
//! and collection names against it, and implements the nine operations the
//! MCP surface exposes. Every operation translates its parameters into one
//! driver call and wraps the outcome in a [`atlas_model::ToolResponse`].

pub mod connection;
pub mod convert;
pub mod ops;

pub use connection::{AtlasConnection, ConnectionError};
pub use ops::{AtlasOps, FindQuery, IndexSpec, OpError, OpResult};
