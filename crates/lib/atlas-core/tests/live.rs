//! Integration tests against a running MongoDB deployment.
//!
//! These are ignored by default; set `MONGODB_URI` and run
//! `cargo test -p atlas-core -- --ignored` with a reachable deployment.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use atlas_core::{AtlasConnection, AtlasOps, FindQuery, IndexSpec};
use atlas_model::JsonObject;
use serde_json::{Value, json};

const TEST_DATABASE: &str = "atlas_mcp_tests";

async fn ops() -> (Arc<AtlasConnection>, AtlasOps) {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set for live tests");
    let conn = Arc::new(
        AtlasConnection::connect(&uri)
            .await
            .expect("connect and ping"),
    );
    let ops = AtlasOps::new(conn.clone());
    (conn, ops)
}

/// Unique collection name per test run so runs never interfere.
fn scratch_collection(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    format!("{label}_{nanos}")
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn data_array(response: &atlas_model::ToolResponse) -> &Vec<Value> {
    response
        .data
        .as_ref()
        .and_then(Value::as_array)
        .expect("array payload")
}

async fn drop_scratch(ops: &AtlasOps, collection: &str) {
    let _ = ops
        .delete_document(TEST_DATABASE, collection, &object(json!({})), true)
        .await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn insert_then_find_round_trip() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("round_trip");

    let document = object(json!({"marker": "rt-1", "qty": 7, "tags": ["new"]}));
    let inserted = ops.insert_document(TEST_DATABASE, &coll, &document).await;
    assert!(inserted.success, "{:?}", inserted.error);
    assert_eq!(inserted.count, Some(1));
    let inserted_id = inserted.data.as_ref().expect("payload")["inserted_id"]
        .as_str()
        .expect("inserted_id string")
        .to_string();
    assert!(!inserted_id.is_empty());

    let found = ops
        .find_documents(
            TEST_DATABASE,
            &coll,
            FindQuery {
                filter: Some(object(json!({"marker": "rt-1"}))),
                ..FindQuery::default()
            },
        )
        .await;
    assert!(found.success, "{:?}", found.error);
    assert_eq!(found.count, Some(1));
    let docs = data_array(&found);
    assert_eq!(docs[0]["marker"], json!("rt-1"));
    assert_eq!(docs[0]["qty"], json!(7));
    // identifier is rendered as the display string of the generated id
    assert_eq!(docs[0]["_id"], json!(inserted_id));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn update_reflects_new_value_and_counts_modified() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("update");

    for name in ["a", "b"] {
        let doc = object(json!({"group": "u-1", "name": name, "state": "old"}));
        assert!(ops.insert_document(TEST_DATABASE, &coll, &doc).await.success);
    }

    let updated = ops
        .update_document(
            TEST_DATABASE,
            &coll,
            &object(json!({"group": "u-1"})),
            &object(json!({"$set": {"state": "new"}})),
            false,
            true,
        )
        .await;
    assert!(updated.success, "{:?}", updated.error);
    assert_eq!(updated.count, Some(2));
    let payload = updated.data.as_ref().expect("payload");
    assert_eq!(payload["matched_count"], json!(2));
    assert_eq!(payload["modified_count"], json!(2));
    assert_eq!(payload["upserted_id"], Value::Null);

    // re-running the same update matches both but modifies none
    let unchanged = ops
        .update_document(
            TEST_DATABASE,
            &coll,
            &object(json!({"group": "u-1"})),
            &object(json!({"$set": {"state": "new"}})),
            false,
            true,
        )
        .await;
    assert!(unchanged.success);
    assert_eq!(unchanged.count, Some(0));
    assert_eq!(unchanged.data.as_ref().expect("payload")["matched_count"], json!(2));

    let found = ops
        .find_documents(
            TEST_DATABASE,
            &coll,
            FindQuery {
                filter: Some(object(json!({"group": "u-1", "state": "new"}))),
                ..FindQuery::default()
            },
        )
        .await;
    assert_eq!(found.count, Some(2));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn multi_delete_empties_the_matching_partition() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("delete");

    for n in 0..3 {
        let doc = object(json!({"group": "d-1", "n": n}));
        assert!(ops.insert_document(TEST_DATABASE, &coll, &doc).await.success);
    }
    let keeper = object(json!({"group": "d-2", "n": 99}));
    assert!(ops.insert_document(TEST_DATABASE, &coll, &keeper).await.success);

    let deleted = ops
        .delete_document(TEST_DATABASE, &coll, &object(json!({"group": "d-1"})), true)
        .await;
    assert!(deleted.success, "{:?}", deleted.error);
    assert_eq!(deleted.count, Some(3));

    let remaining = ops
        .find_documents(
            TEST_DATABASE,
            &coll,
            FindQuery {
                filter: Some(object(json!({"group": "d-1"}))),
                ..FindQuery::default()
            },
        )
        .await;
    assert!(remaining.success);
    assert_eq!(remaining.count, Some(0));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn upsert_with_no_match_creates_exactly_one_document() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("upsert");

    let upserted = ops
        .update_document(
            TEST_DATABASE,
            &coll,
            &object(json!({"slot": "only-one"})),
            &object(json!({"$set": {"filled": true}})),
            true,
            false,
        )
        .await;
    assert!(upserted.success, "{:?}", upserted.error);
    let payload = upserted.data.as_ref().expect("payload");
    assert_eq!(payload["matched_count"], json!(0));
    let upserted_id = payload["upserted_id"].as_str().expect("upserted_id string");
    assert!(!upserted_id.is_empty());

    let found = ops
        .find_documents(
            TEST_DATABASE,
            &coll,
            FindQuery {
                filter: Some(object(json!({"slot": "only-one"}))),
                ..FindQuery::default()
            },
        )
        .await;
    assert_eq!(found.count, Some(1));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn aggregation_groups_and_sums_per_group() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("aggregate");

    for (region, sales) in [("east", 50), ("east", 30), ("west", 20)] {
        let doc = object(json!({"region": region, "sales": sales}));
        assert!(ops.insert_document(TEST_DATABASE, &coll, &doc).await.success);
    }

    let pipeline = vec![
        object(json!({"$group": {"_id": "$region", "total_sales": {"$sum": "$sales"}}})),
        object(json!({"$sort": {"_id": 1}})),
    ];
    let result = ops.aggregate(TEST_DATABASE, &coll, &pipeline).await;
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.count, Some(2));
    let groups = data_array(&result);
    assert_eq!(groups[0]["_id"], json!("east"));
    assert_eq!(groups[0]["total_sales"], json!(80));
    assert_eq!(groups[1]["_id"], json!("west"));
    assert_eq!(groups[1]["total_sales"], json!(20));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn skip_applies_before_limit() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("window");

    for n in 0..10 {
        let doc = object(json!({"n": n}));
        assert!(ops.insert_document(TEST_DATABASE, &coll, &doc).await.success);
    }

    let window = ops
        .find_documents(
            TEST_DATABASE,
            &coll,
            FindQuery {
                sort: Some(vec![("n".to_string(), json!(1))]),
                skip: Some(3),
                limit: Some(4),
                ..FindQuery::default()
            },
        )
        .await;
    assert!(window.success, "{:?}", window.error);
    assert_eq!(window.count, Some(4));
    let values: Vec<i64> = data_array(&window)
        .iter()
        .map(|doc| doc["n"].as_i64().expect("n"))
        .collect();
    assert_eq!(values, [3, 4, 5, 6]);

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn unique_index_violation_surfaces_as_failed_envelope() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("unique_idx");

    let created = ops
        .create_index(
            TEST_DATABASE,
            &coll,
            IndexSpec {
                keys: vec![("email".to_string(), json!(1))],
                name: Some("email_unique".to_string()),
                unique: true,
                ..IndexSpec::default()
            },
        )
        .await;
    assert!(created.success, "{:?}", created.error);
    assert_eq!(
        created.data.as_ref().expect("payload")["index_name"],
        json!("email_unique")
    );

    let listed = ops.list_indexes(TEST_DATABASE, &coll).await;
    assert!(listed.success);
    let names: Vec<&str> = data_array(&listed)
        .iter()
        .map(|idx| idx["name"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&"email_unique"));

    let first = object(json!({"email": "dup@example.com"}));
    assert!(ops.insert_document(TEST_DATABASE, &coll, &first).await.success);
    let duplicate = ops.insert_document(TEST_DATABASE, &coll, &first).await;
    assert!(!duplicate.success);
    assert!(duplicate.error.is_some());
    assert!(duplicate.data.is_none());

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn listing_surfaces_names_with_zeroed_statistics() {
    let (conn, ops) = ops().await;
    let coll = scratch_collection("listing");

    let doc = object(json!({"present": true}));
    assert!(ops.insert_document(TEST_DATABASE, &coll, &doc).await.success);

    let databases = ops.list_databases().await;
    assert!(databases.success, "{:?}", databases.error);
    let names: Vec<&str> = data_array(&databases)
        .iter()
        .map(|db| db["name"].as_str().expect("name"))
        .collect();
    assert!(names.contains(&TEST_DATABASE));

    let collections = ops.list_collections(TEST_DATABASE).await;
    assert!(collections.success);
    let entry = data_array(&collections)
        .iter()
        .find(|entry| entry["name"] == json!(coll.as_str()))
        .expect("scratch collection listed")
        .clone();
    assert_eq!(entry["count"], json!(0));
    assert_eq!(entry["size"], json!(0));

    drop_scratch(&ops, &coll).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB deployment"]
async fn operations_after_close_return_not_connected_envelopes() {
    let (conn, ops) = ops().await;
    conn.close().await;
    // close is idempotent
    conn.close().await;

    let response = ops.list_databases().await;
    assert!(!response.success);
    assert!(
        response
            .error
            .as_deref()
            .expect("error string")
            .contains("not connected")
    );
}
