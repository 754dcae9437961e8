//! PATCH: update by primary key, skipping unknown keys.

use restkit::batch::{BatchHandler, BatchMethod, BatchResponse};
use restkit::store::{Filter, InMemoryStore, RecordStore};
use restkit::{BatchError, Record, StoreError};
use serde_json::json;

use crate::support::{params, product_schema, rows, seeded, shop_filters};

#[test]
fn unknown_keys_become_null_slots() {
    let store = seeded(json!([{ "id": 1, "sku": "A", "name": "old", "shop": 1 }]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Update,
            &json!({ "items": [{ "id": 1, "name": "a" }, { "id": 999, "name": "b" }] }),
            &Record::new(),
        )
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.to_body(),
        json!({ "items": [{ "id": 1, "sku": "A", "name": "a", "shop": 1 }, null] })
    );
    assert_eq!(rows(&store).len(), 1);
}

#[test]
fn output_mirrors_input_order() {
    let store = seeded(json!([
        { "sku": "A", "shop": 1 },
        { "sku": "B", "shop": 1 },
        { "sku": "C", "shop": 1 }
    ]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Update,
            &json!({ "items": [
                { "id": 3, "name": "third" },
                { "name": "no key" },
                { "id": "1", "name": "first" },
                { "id": 42 }
            ] }),
            &Record::new(),
        )
        .unwrap();

    let BatchResponse::Items(items) = response else {
        panic!("expected items");
    };
    let ids: Vec<_> = items
        .iter()
        .map(|item| item.as_ref().map(|v| v["id"].clone()))
        .collect();
    assert_eq!(ids, vec![Some(json!(3)), None, Some(json!(1)), None]);
    assert_eq!(rows(&store)[1]["name"], serde_json::Value::Null);
}

#[test]
fn partial_update_keeps_other_fields() {
    let store = seeded(json!([{ "sku": "A", "name": "keep", "shop": 2 }]));
    let schema = product_schema();

    BatchHandler::new(&store, &schema)
        .execute(BatchMethod::Update, &json!({ "items": [{ "id": 1, "sku": "Z" }] }), &Record::new())
        .unwrap();

    assert_eq!(rows(&store), vec![json!({ "id": 1, "sku": "Z", "name": "keep", "shop": 2 })]);
}

#[test]
fn request_filter_does_not_apply_to_updates() {
    let store = seeded(json!([{ "sku": "A", "shop": 1 }]));
    let schema = product_schema();
    let filters = shop_filters();

    let response = BatchHandler::new(&store, &schema)
        .filterset(&filters)
        .execute(
            BatchMethod::Update,
            &json!({ "items": [{ "id": 1, "name": "seen" }] }),
            &params(json!({ "shop": "2" })),
        )
        .unwrap();

    assert_eq!(
        response.to_body(),
        json!({ "items": [{ "id": 1, "sku": "A", "name": "seen", "shop": 1 }] })
    );
}

#[test]
fn records_outside_the_scope_are_skipped() {
    let store = seeded(json!([{ "sku": "A", "shop": 1 }, { "sku": "B", "shop": 2 }]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .scope(Filter::all().eq("shop", 2))
        .execute(
            BatchMethod::Update,
            &json!({ "items": [{ "id": 1, "name": "x" }, { "id": 2, "name": "y" }] }),
            &Record::new(),
        )
        .unwrap();

    assert_eq!(
        response.to_body(),
        json!({ "items": [null, { "id": 2, "sku": "B", "name": "y", "shop": 2 }] })
    );
    assert_eq!(rows(&store)[0], json!({ "id": 1, "sku": "A", "shop": 1 }));
}

#[test]
fn conflict_on_a_later_item_rolls_back_earlier_updates() {
    let store = InMemoryStore::new("id").with_unique(&["sku"]).unwrap();
    store
        .atomic(|tx| -> Result<(), StoreError> {
            tx.create(params(json!({ "sku": "A", "name": "a", "shop": 1 })))?;
            tx.create(params(json!({ "sku": "B", "name": "b", "shop": 1 })))?;
            Ok(())
        })
        .unwrap();
    let before = rows(&store);
    let schema = product_schema();

    let err = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Update,
            &json!({ "items": [{ "id": 1, "name": "renamed" }, { "id": 2, "sku": "A" }] }),
            &Record::new(),
        )
        .unwrap_err();

    assert!(matches!(err, BatchError::Store(StoreError::Duplicate { ref field, .. }) if field == "sku"));
    assert_eq!(rows(&store), before);
}
