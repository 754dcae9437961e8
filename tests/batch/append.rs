//! POST: add the submitted items, keep everything else.

use restkit::batch::{BatchHandler, BatchMethod};
use restkit::store::InMemoryStore;
use restkit::{BatchError, Record, StoreError};
use serde_json::json;

use crate::support::{product_schema, rows, seeded};

#[test]
fn append_keeps_existing_records() {
    let store = seeded(json!([{ "sku": "A", "shop": 1 }]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Append,
            &json!({ "items": [{ "sku": "B" }, { "sku": "C", "shop": "2" }] }),
            &Record::new(),
        )
        .unwrap();

    assert!(response.is_success());
    assert_eq!(
        rows(&store),
        vec![
            json!({ "id": 1, "sku": "A", "shop": 1 }),
            json!({ "id": 2, "sku": "B", "shop": 1 }),
            json!({ "id": 3, "sku": "C", "shop": 2 })
        ]
    );
}

#[test]
fn duplicate_during_commit_rolls_back_everything() {
    let store = InMemoryStore::new("id").with_unique(&["sku"]).unwrap();
    let schema = product_schema();
    BatchHandler::new(&store, &schema)
        .execute(BatchMethod::Append, &json!({ "items": [{ "sku": "A" }] }), &Record::new())
        .unwrap();

    let err = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Append,
            &json!({ "items": [{ "sku": "B" }, { "sku": "A" }] }),
            &Record::new(),
        )
        .unwrap_err();

    assert!(matches!(err, BatchError::Store(StoreError::Duplicate { ref field, .. }) if field == "sku"));
    assert_eq!(rows(&store), vec![json!({ "id": 1, "sku": "A", "shop": 1 })]);
}
