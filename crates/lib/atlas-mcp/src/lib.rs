//! MCP server implementation for atlas-mcp.
//!
//! This crate wires the database operation set into rmcp tool handlers and
//! exposes the MCP-facing API surface for CRUD, aggregation, and index
//! management.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use atlas_core::AtlasOps;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r"atlas-mcp provides MCP tools for working with a MongoDB deployment.

Workflow:
1. Discover: `list_databases`, then `list_collections` for a database.
2. Read: `find_documents` (filter, projection, sort, skip, limit) or
   `aggregate` with an ordered pipeline of stages.
3. Write: `insert_document`, `update_document` (upsert/multi flags),
   `delete_document` (multi flag).
4. Indexes: `create_index` with ordered (field, direction) keys,
   `list_indexes`.

Notes:
- Every tool returns one envelope: `success`, `data`, `error`, `count`, and
  an optional `message`. A failed call sets `success: false` and `error`;
  an empty-but-successful call sets `success: true` with `count: 0`.
- Filters, update specs, and pipeline stages are passed to the database
  verbatim; the server rejects malformed shapes but does not interpret them.
- Document `_id` values in find results are display strings.
- Database and collection listings report names only; size statistics are
  zeroed placeholders.
- `health` returns `ok`.";

/// MCP server wrapper around the database operation set and tool routers.
#[derive(Clone)]
pub struct AtlasMcp {
    tool_router: ToolRouter<Self>,
    ops: Arc<AtlasOps>,
}

impl AtlasMcp {
    /// Creates a new server taking ownership of the operation set.
    #[must_use]
    pub fn new(ops: AtlasOps) -> Self {
        Self::with_ops(Arc::new(ops))
    }

    /// Creates a new server using a shared operation-set handle.
    #[must_use]
    pub fn with_ops(ops: Arc<AtlasOps>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_admin()
            + Self::tool_router_documents()
            + Self::tool_router_indexes();
        Self { tool_router, ops }
    }

    pub(crate) fn ops(&self) -> &AtlasOps {
        &self.ops
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl AtlasMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for AtlasMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
