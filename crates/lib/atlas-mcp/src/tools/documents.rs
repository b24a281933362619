use atlas_core::FindQuery;
use atlas_model::JsonObject;
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

/// Parameters for querying documents.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FindDocumentsParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Query filter; omit to match every document.
    #[serde(default)]
    pub filter: Option<JsonObject>,
    /// Field allow/deny map, e.g. {"name": 1} or {"password": 0}.
    #[serde(default)]
    pub projection: Option<JsonObject>,
    /// Ordered sort specification.
    #[serde(default)]
    pub sort: Option<Vec<KeySpec>>,
    /// Maximum documents to return; 0 or omitted means unbounded.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Documents to skip before returning results; applied before limit.
    #[serde(default)]
    pub skip: Option<u64>,
}

/// Parameters for inserting one document.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InsertDocumentParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Document to insert.
    pub document: JsonObject,
}

/// Parameters for updating documents.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateDocumentParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Filter selecting the documents to update.
    pub filter: JsonObject,
    /// Update specification, e.g. {"$set": {"state": "done"}}.
    pub update: JsonObject,
    /// Insert a new document when nothing matches the filter.
    #[serde(default)]
    pub upsert: bool,
    /// Update every match instead of at most one.
    #[serde(default)]
    pub multi: bool,
}

/// Parameters for deleting documents.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DeleteDocumentParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Filter selecting the documents to delete.
    pub filter: JsonObject,
    /// Delete every match instead of at most one.
    #[serde(default)]
    pub multi: bool,
}

/// Parameters for running an aggregation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AggregateParams {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Ordered pipeline stages, passed to the database verbatim.
    pub pipeline: Vec<JsonObject>,
}

#[tool_router(router = tool_router_documents, vis = "pub")]
impl AtlasMcp {
    #[tool(
        description = "Query documents with optional filter, projection, sort, skip, and limit."
    )]
    async fn find_documents(
        &self,
        Parameters(params): Parameters<FindDocumentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let query = FindQuery {
            filter: params.filter,
            projection: params.projection,
            sort: params
                .sort
                .map(|sort| sort.into_iter().map(KeySpec::into_pair).collect()),
            limit: params.limit,
            skip: params.skip,
        };
        Ok(helpers::envelope(
            self.ops()
                .find_documents(&params.database, &params.collection, query)
                .await,
        ))
    }

    #[tool(description = "Insert one document into a collection.")]
    async fn insert_document(
        &self,
        Parameters(params): Parameters<InsertDocumentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops()
                .insert_document(&params.database, &params.collection, &params.document)
                .await,
        ))
    }

    #[tool(
        description = "Update matching documents. Set multi to update all matches, upsert to insert on no match."
    )]
    async fn update_document(
        &self,
        Parameters(params): Parameters<UpdateDocumentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops()
                .update_document(
                    &params.database,
                    &params.collection,
                    &params.filter,
                    &params.update,
                    params.upsert,
                    params.multi,
                )
                .await,
        ))
    }

    #[tool(description = "Delete matching documents. Set multi to delete all matches.")]
    async fn delete_document(
        &self,
        Parameters(params): Parameters<DeleteDocumentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops()
                .delete_document(
                    &params.database,
                    &params.collection,
                    &params.filter,
                    params.multi,
                )
                .await,
        ))
    }

    #[tool(description = "Run an aggregation pipeline against a collection.")]
    async fn aggregate(
        &self,
        Parameters(params): Parameters<AggregateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::envelope(
            self.ops()
                .aggregate(&params.database, &params.collection, &params.pipeline)
                .await,
        ))
    }
}
