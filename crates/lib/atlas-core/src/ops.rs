use std::sync::Arc;
use std::{error::Error, fmt};

use atlas_model::{CollectionInfo, DatabaseInfo, JsonObject, ToolResponse};
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use serde_json::{Value, json};

use crate::connection::{AtlasConnection, ConnectionError};
use crate::convert;

#[derive(Debug)]
pub enum OpError {
    NotConnected,
    InvalidArgument(String),
    Encode(String),
    Mongo(Box<mongodb::error::Error>),
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected to MongoDB"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Encode(message) => write!(f, "result not representable as JSON: {message}"),
            Self::Mongo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OpError {}

impl From<mongodb::error::Error> for OpError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Mongo(Box::new(err))
    }
}

impl From<ConnectionError> for OpError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::NotConnected => Self::NotConnected,
            ConnectionError::EmptyUri => Self::InvalidArgument(err.to_string()),
            ConnectionError::Mongo(err) => Self::Mongo(err),
        }
    }
}

pub type OpResult<T> = Result<T, OpError>;

/// Query shape for `find_documents`. Defaults match every document with no
/// projection, sort, skip, or bound.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    pub filter: Option<JsonObject>,
    pub projection: Option<JsonObject>,
    /// Ordered `(field, direction)` pairs.
    pub sort: Option<Vec<(String, Value)>>,
    /// Zero or absent means unbounded.
    pub limit: Option<i64>,
    pub skip: Option<u64>,
}

/// Index definition for `create_index`.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Ordered `(field, direction)` pairs.
    pub keys: Vec<(String, Value)>,
    pub name: Option<String>,
    pub unique: bool,
    pub sparse: bool,
    pub background: bool,
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            name: None,
            unique: false,
            sparse: false,
            background: true,
        }
    }
}

/// The nine database operations exposed as MCP tools.
///
/// Each method issues exactly one driver call against the shared connection
/// and always returns an envelope; driver failures are captured here, never
/// propagated.
pub struct AtlasOps {
    conn: Arc<AtlasConnection>,
}

impl AtlasOps {
    #[must_use]
    pub fn new(conn: Arc<AtlasConnection>) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn connection(&self) -> &Arc<AtlasConnection> {
        &self.conn
    }

    pub async fn list_databases(&self) -> ToolResponse {
        match self.try_list_databases().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "failed to list databases");
                ToolResponse::fail_with_message(err.to_string(), "failed to list databases")
            }
        }
    }

    async fn try_list_databases(&self) -> OpResult<ToolResponse> {
        let client = self.conn.client().await?;
        let names = client.list_database_names().await?;
        let databases: Vec<DatabaseInfo> = names.into_iter().map(DatabaseInfo::new).collect();
        let count = databases.len() as u64;
        let data = serde_json::to_value(&databases).map_err(|err| OpError::Encode(err.to_string()))?;
        Ok(ToolResponse::ok_with_message(data, count, "listed databases"))
    }

    pub async fn list_collections(&self, database: &str) -> ToolResponse {
        match self.try_list_collections(database).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, database, "failed to list collections");
                ToolResponse::fail_with_message(err.to_string(), "failed to list collections")
            }
        }
    }

    async fn try_list_collections(&self, database: &str) -> OpResult<ToolResponse> {
        let db = self.conn.database(database).await?;
        let names = db.list_collection_names().await?;
        let collections: Vec<CollectionInfo> = names.into_iter().map(CollectionInfo::new).collect();
        let count = collections.len() as u64;
        let data =
            serde_json::to_value(&collections).map_err(|err| OpError::Encode(err.to_string()))?;
        Ok(ToolResponse::ok_with_message(data, count, "listed collections"))
    }

    pub async fn find_documents(
        &self,
        database: &str,
        collection: &str,
        query: FindQuery,
    ) -> ToolResponse {
        match self.try_find_documents(database, collection, query).await {
            Ok(response) => response,
            Err(err) => op_failed("failed to query documents", &err),
        }
    }

    async fn try_find_documents(
        &self,
        database: &str,
        collection: &str,
        query: FindQuery,
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let filter = match &query.filter {
            Some(filter) => convert::document_from_object(filter)?,
            None => Document::new(),
        };

        let mut find = coll.find(filter);
        if let Some(projection) = &query.projection {
            find = find.projection(convert::document_from_object(projection)?);
        }
        if let Some(sort) = &query.sort {
            find = find.sort(convert::keys_document(sort)?);
        }
        if let Some(skip) = query.skip {
            if skip > 0 {
                find = find.skip(skip);
            }
        }
        if let Some(limit) = query.limit {
            if limit > 0 {
                find = find.limit(limit);
            }
        }

        let docs: Vec<Document> = find.await?.try_collect().await?;
        let mut data = Vec::with_capacity(docs.len());
        for mut doc in docs {
            // identifiers travel as display strings, not typed BSON
            let display = doc.get("_id").map(convert::display_id);
            if let Some(display) = display {
                doc.insert("_id", display);
            }
            data.push(convert::json_from_document(&doc)?);
        }
        let count = data.len() as u64;
        Ok(ToolResponse::ok(Value::Array(data), count))
    }

    pub async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &JsonObject,
    ) -> ToolResponse {
        match self.try_insert_document(database, collection, document).await {
            Ok(response) => response,
            Err(err) => op_failed("failed to insert document", &err),
        }
    }

    async fn try_insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &JsonObject,
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let doc = convert::document_from_object(document)?;
        let result = coll.insert_one(doc).await?;
        let data = json!({ "inserted_id": convert::display_id(&result.inserted_id) });
        Ok(ToolResponse::ok(data, 1))
    }

    pub async fn update_document(
        &self,
        database: &str,
        collection: &str,
        filter: &JsonObject,
        update: &JsonObject,
        upsert: bool,
        multi: bool,
    ) -> ToolResponse {
        match self
            .try_update_document(database, collection, filter, update, upsert, multi)
            .await
        {
            Ok(response) => response,
            Err(err) => op_failed("failed to update document", &err),
        }
    }

    async fn try_update_document(
        &self,
        database: &str,
        collection: &str,
        filter: &JsonObject,
        update: &JsonObject,
        upsert: bool,
        multi: bool,
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let filter = convert::document_from_object(filter)?;
        let update = convert::document_from_object(update)?;

        let result = if multi {
            coll.update_many(filter, update).upsert(upsert).await?
        } else {
            coll.update_one(filter, update).upsert(upsert).await?
        };

        let data = json!({
            "matched_count": result.matched_count,
            "modified_count": result.modified_count,
            "upserted_id": result.upserted_id.as_ref().map(convert::display_id),
        });
        Ok(ToolResponse::ok(data, result.modified_count))
    }

    pub async fn delete_document(
        &self,
        database: &str,
        collection: &str,
        filter: &JsonObject,
        multi: bool,
    ) -> ToolResponse {
        match self
            .try_delete_document(database, collection, filter, multi)
            .await
        {
            Ok(response) => response,
            Err(err) => op_failed("failed to delete document", &err),
        }
    }

    async fn try_delete_document(
        &self,
        database: &str,
        collection: &str,
        filter: &JsonObject,
        multi: bool,
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let filter = convert::document_from_object(filter)?;
        let result = if multi {
            coll.delete_many(filter).await?
        } else {
            coll.delete_one(filter).await?
        };
        let data = json!({ "deleted_count": result.deleted_count });
        Ok(ToolResponse::ok(data, result.deleted_count))
    }

    pub async fn aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: &[JsonObject],
    ) -> ToolResponse {
        match self.try_aggregate(database, collection, pipeline).await {
            Ok(response) => response,
            Err(err) => op_failed("failed to run aggregation pipeline", &err),
        }
    }

    async fn try_aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: &[JsonObject],
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let stages = convert::documents_from_objects(pipeline)?;
        let docs: Vec<Document> = coll.aggregate(stages).await?.try_collect().await?;
        let mut data = Vec::with_capacity(docs.len());
        for doc in &docs {
            data.push(convert::json_from_document(doc)?);
        }
        let count = data.len() as u64;
        Ok(ToolResponse::ok(Value::Array(data), count))
    }

    pub async fn create_index(
        &self,
        database: &str,
        collection: &str,
        spec: IndexSpec,
    ) -> ToolResponse {
        match self.try_create_index(database, collection, spec).await {
            Ok(response) => response,
            Err(err) => op_failed("failed to create index", &err),
        }
    }

    async fn try_create_index(
        &self,
        database: &str,
        collection: &str,
        spec: IndexSpec,
    ) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let keys = convert::keys_document(&spec.keys)?;
        let options = IndexOptions::builder()
            .name(spec.name)
            .unique(spec.unique)
            .sparse(spec.sparse)
            .background(spec.background)
            .build();
        let model = IndexModel::builder().keys(keys).options(options).build();
        let created = coll.create_index(model).await?;
        let data = json!({ "index_name": created.index_name });
        Ok(ToolResponse::ok(data, 1))
    }

    pub async fn list_indexes(&self, database: &str, collection: &str) -> ToolResponse {
        match self.try_list_indexes(database, collection).await {
            Ok(response) => response,
            Err(err) => op_failed("failed to list indexes", &err),
        }
    }

    async fn try_list_indexes(&self, database: &str, collection: &str) -> OpResult<ToolResponse> {
        let coll = self.conn.collection(database, collection).await?;
        let models: Vec<IndexModel> = coll.list_indexes().await?.try_collect().await?;
        let indexes: Vec<_> = models.iter().map(convert::index_info).collect();
        let count = indexes.len() as u64;
        let data = serde_json::to_value(&indexes).map_err(|err| OpError::Encode(err.to_string()))?;
        Ok(ToolResponse::ok(data, count))
    }
}

fn op_failed(context: &str, err: &OpError) -> ToolResponse {
    tracing::error!(error = %err, "{}", context);
    ToolResponse::fail(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_query_defaults_are_unbounded() {
        let query = FindQuery::default();
        assert!(query.filter.is_none());
        assert!(query.sort.is_none());
        assert!(query.limit.is_none());
        assert!(query.skip.is_none());
    }

    #[test]
    fn index_spec_builds_in_background_by_default() {
        let spec = IndexSpec::default();
        assert!(spec.background);
        assert!(!spec.unique);
        assert!(!spec.sparse);
    }

    #[test]
    fn not_connected_maps_through_from_connection_error() {
        let err = OpError::from(ConnectionError::NotConnected);
        assert!(matches!(err, OpError::NotConnected));
        assert_eq!(err.to_string(), "not connected to MongoDB");
    }

    #[test]
    fn op_failed_prefixes_the_context() {
        let response = op_failed(
            "failed to query documents",
            &OpError::InvalidArgument("bad filter".to_string()),
        );
        assert!(!response.success);
        let error = response.error.expect("error string");
        assert!(error.starts_with("failed to query documents: "));
        assert!(error.contains("bad filter"));
    }
}
