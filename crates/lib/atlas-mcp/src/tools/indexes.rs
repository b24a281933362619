use atlas_core::IndexSpec;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::tools::KeySpec;
use crate::{AtlasMcp, helpers};

fn default_background() -> bool {
    true
}

/// Parameters for creating an index.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateIndexParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Ordered index keys.
    pub keys: Vec<KeySpec>,
    /// Index name; generated by the database when omitted.
    #[serde(default)]
    pub name: Option<String>,
    /// Reject duplicate values for the indexed fields.
    #[serde(default)]
    pub unique: bool,
    /// Skip documents missing the indexed fields.
    #[serde(default)]
    pub sparse: bool,
    /// Build the index in the background (default true).
    #[serde(default = "default_background")]
    pub background: bool,
}

/// Parameters for listing the indexes of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListIndexesParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
}

#[tool_router(router = tool_router_indexes, vis = "pub")]
impl AtlasMcp {
    #[tool(description = "Create an index on a collection from ordered (field, direction) keys.")]
    async fn create_index(
        &self,
        Parameters(params): Parameters<CreateIndexParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let spec = IndexSpec {
            keys: params.keys.into_iter().map(KeySpec::into_pair).collect(),
            name: params.name,
            unique: params.unique,
            sparse: params.sparse,
            background: params.background,
        };
        Ok(helpers::envelope(
            self.ops()
                .create_index(&params.database, &params.collection, spec)
                .await,
        ))
    }

    #[tool(description = "List the indexes of a collection.")]
    async fn list_indexes(
        &self,
        Parameters(params): Parameters<ListIndexesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops()
                .list_indexes(&params.database, &params.collection)
                .await,
        ))
    }
}
