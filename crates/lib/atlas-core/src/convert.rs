//! JSON/BSON boundary helpers.
//!
//! Tool arguments arrive as JSON and driver results leave as JSON; the
//! conversions here are the only place the two representations meet.
//! Filters, update specs, and pipeline stages are converted structurally,
//! never interpreted.

use atlas_model::{IndexInfo, IndexKey, JsonObject};
use mongodb::IndexModel;
use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::ops::{OpError, OpResult};

/// Converts a JSON object into a BSON document, verbatim.
///
/// # Errors
/// Returns `OpError::InvalidArgument` if the object contains values BSON
/// cannot represent.
pub fn document_from_object(object: &JsonObject) -> OpResult<Document> {
    mongodb::bson::to_document(object).map_err(|err| OpError::InvalidArgument(err.to_string()))
}

/// Converts an ordered sequence of JSON objects into BSON documents.
///
/// # Errors
/// Returns `OpError::InvalidArgument` on the first unconvertible stage.
pub fn documents_from_objects(objects: &[JsonObject]) -> OpResult<Vec<Document>> {
    objects.iter().map(document_from_object).collect()
}

/// Builds an ordered key document from `(field, direction)` pairs, as used
/// by sort specifications and index keys.
///
/// # Errors
/// Returns `OpError::InvalidArgument` if a direction value cannot be
/// represented in BSON.
pub fn keys_document(keys: &[(String, Value)]) -> OpResult<Document> {
    let mut doc = Document::new();
    for (field, direction) in keys {
        let direction = mongodb::bson::to_bson(direction)
            .map_err(|err| OpError::InvalidArgument(err.to_string()))?;
        doc.insert(field.clone(), direction);
    }
    Ok(doc)
}

/// Renders a BSON document as a JSON value.
///
/// # Errors
/// Returns `OpError::Encode` if the document holds values JSON cannot carry
/// (for example a NaN double).
pub fn json_from_document(doc: &Document) -> OpResult<Value> {
    serde_json::to_value(doc).map_err(|err| OpError::Encode(err.to_string()))
}

/// Renders a document identifier as a display string, since the transport
/// only carries text-safe structures.
#[must_use]
pub fn display_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps a driver index model onto the reported descriptor shape.
#[must_use]
pub fn index_info(model: &IndexModel) -> IndexInfo {
    let options = model.options.as_ref();
    let key = model
        .keys
        .iter()
        .map(|(field, direction)| IndexKey {
            field: field.clone(),
            direction: serde_json::to_value(direction).unwrap_or(Value::Null),
        })
        .collect();
    IndexInfo {
        name: options
            .and_then(|opts| opts.name.clone())
            .unwrap_or_default(),
        key,
        unique: options.and_then(|opts| opts.unique).unwrap_or(false),
        sparse: options.and_then(|opts| opts.sparse).unwrap_or(false),
        background: options.and_then(|opts| opts.background).unwrap_or(true),
    }
}
