//! PUT: replace the (filtered) collection with the submitted items.

use restkit::batch::{BatchHandler, BatchMethod, BatchSettings, CreateMethod};
use restkit::Record;
use serde_json::json;

use crate::support::{params, product_schema, rows, seeded, shop_filters};

#[test]
fn replace_leaves_exactly_the_submitted_items() {
    let store = seeded(json!([
        { "sku": "A", "name": "old", "shop": 1 },
        { "sku": "B", "name": "old", "shop": 1 }
    ]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Replace,
            &json!({ "items": [{ "sku": "C" }, { "sku": "D", "name": "new" }] }),
            &Record::new(),
        )
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.to_body(),
        json!({ "items": [
            { "id": 3, "sku": "C", "shop": 1 },
            { "id": 4, "sku": "D", "name": "new", "shop": 1 }
        ] })
    );
    assert_eq!(
        rows(&store),
        vec![
            json!({ "id": 3, "sku": "C", "shop": 1 }),
            json!({ "id": 4, "sku": "D", "name": "new", "shop": 1 })
        ]
    );
}

#[test]
fn replace_deletes_records_missing_from_the_submission() {
    let store = seeded(json!([{ "sku": "X" }, { "sku": "Y" }]));
    let schema = product_schema();

    BatchHandler::new(&store, &schema)
        .execute(BatchMethod::Replace, &json!({ "items": [{ "sku": "X" }] }), &Record::new())
        .unwrap();

    let remaining = rows(&store);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["sku"], "X");
}

#[test]
fn get_or_create_keeps_matching_records() {
    let store = seeded(json!([{ "sku": "X", "shop": 1 }, { "sku": "Y", "shop": 1 }]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .settings(BatchSettings::default().create_method(CreateMethod::GetOrCreate))
        .execute(BatchMethod::Replace, &json!({ "items": [{ "sku": "X" }] }), &Record::new())
        .unwrap();

    assert_eq!(response.to_body(), json!({ "items": [{ "id": 1, "sku": "X", "shop": 1 }] }));
    assert_eq!(rows(&store), vec![json!({ "id": 1, "sku": "X", "shop": 1 })]);
}

#[test]
fn request_filter_limits_what_gets_replaced() {
    let store = seeded(json!([
        { "sku": "X", "shop": 1 },
        { "sku": "Y", "shop": 2 }
    ]));
    let schema = product_schema();
    let filters = shop_filters();

    BatchHandler::new(&store, &schema)
        .filterset(&filters)
        .execute(
            BatchMethod::Replace,
            &json!({ "items": [{ "sku": "Z", "shop": 1 }] }),
            &params(json!({ "shop": "1" })),
        )
        .unwrap();

    let skus: Vec<_> = rows(&store).iter().map(|r| r["sku"].clone()).collect();
    assert_eq!(skus, vec![json!("Y"), json!("Z")]);
}

#[test]
fn invalid_filter_parameters_are_rejected_before_writing() {
    let store = seeded(json!([{ "sku": "X", "shop": 1 }]));
    let schema = product_schema();
    let filters = restkit::store::FieldFilterSet::new()
        .bind("min_shop", "shop", restkit::store::LookupKind::Gte);

    let response = BatchHandler::new(&store, &schema)
        .filterset(&filters)
        .execute(
            BatchMethod::Replace,
            &json!({ "items": [{ "sku": "Z" }] }),
            &params(json!({ "min_shop": "many" })),
        )
        .unwrap();

    assert_eq!(response.status(), 400);
    restkit::testing::assert_friendly_error(
        response.status(),
        &response.to_body(),
        restkit::testing::Expect::new().code(2011).field("min_shop"),
    );
    assert_eq!(rows(&store).len(), 1);
}
