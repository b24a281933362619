//! MCP tool modules.
//!
//! Tools are grouped by domain: database/collection administration, document
//! access and mutation, and index management.

pub mod admin;
pub mod documents;
pub mod indexes;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// One `(field, direction)` pair in a sort or index key specification.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct KeySpec {
    /// Field name to order by.
    pub field: String,
    /// 1 for ascending, -1 for descending; strings such as "text" pass
    /// through to the database unvalidated.
    pub direction: serde_json::Value,
}

impl KeySpec {
    pub(crate) fn into_pair(self) -> (String, serde_json::Value) {
        (self.field, self.direction)
    }
}
