use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Database entry returned by `list_databases`.
///
/// Size and emptiness statistics require privileged commands, so they are
/// reported as zeroed placeholders rather than queried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub name: String,
    pub size_on_disk: u64,
    pub empty: bool,
}

impl DatabaseInfo {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_on_disk: 0,
            empty: false,
        }
    }
}

/// Collection entry returned by `list_collections`.
///
/// Document counts and sizes are zeroed placeholders, same rationale as
/// [`DatabaseInfo`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    pub count: u64,
    pub size: u64,
    pub avg_obj_size: u64,
}

impl CollectionInfo {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            size: 0,
            avg_obj_size: 0,
        }
    }
}

/// One `(field, direction)` pair in an index key specification.
///
/// `direction` is `1` or `-1` for ordered keys; string values such as
/// `"text"` are passed through to the driver unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexKey {
    pub field: String,
    pub direction: Value,
}

/// Index descriptor returned by `list_indexes`; identified by `name` within
/// its collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexInfo {
    pub name: String,
    pub key: Vec<IndexKey>,
    pub unique: bool,
    pub sparse: bool,
    pub background: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn database_info_reports_zeroed_statistics() {
        let info = DatabaseInfo::new("inventory");
        assert_eq!(
            serde_json::to_value(&info).expect("serializable"),
            json!({"name": "inventory", "size_on_disk": 0, "empty": false})
        );
    }

    #[test]
    fn index_info_round_trips_mixed_directions() {
        let info = IndexInfo {
            name: "title_text".to_string(),
            key: vec![
                IndexKey {
                    field: "title".to_string(),
                    direction: json!("text"),
                },
                IndexKey {
                    field: "year".to_string(),
                    direction: json!(-1),
                },
            ],
            unique: false,
            sparse: true,
            background: true,
        };
        let value = serde_json::to_value(&info).expect("serializable");
        let back: IndexInfo = serde_json::from_value(value).expect("deserializable");
        assert_eq!(back, info);
    }
}
