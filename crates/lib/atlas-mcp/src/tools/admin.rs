use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{AtlasMcp, helpers};

/// Parameters for listing the collections of a database.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListCollectionsParams {
    /// Database name.
    pub database: String,
}

#[tool_router(router = tool_router_admin, vis = "pub")]
impl AtlasMcp {
    #[tool(description = "List the databases of the connected deployment.")]
    async fn list_databases(&self) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(self.ops().list_databases().await))
    }

    #[tool(description = "List the collections of a database.")]
    async fn list_collections(
        &self,
        Parameters(params): Parameters<ListCollectionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops().list_collections(&params.database).await,
        ))
    }
}
