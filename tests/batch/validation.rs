//! Validate-all-then-commit: one bad item rejects the whole batch.

use restkit::batch::{BatchHandler, BatchMethod, BatchResponse};
use restkit::friendly::codes;
use restkit::Record;
use serde_json::json;

use crate::support::{product_schema, rows, seeded};

#[test]
fn one_invalid_item_blocks_every_method() {
    let initial = json!([{ "sku": "A", "shop": 1 }, { "sku": "B", "shop": 1 }]);
    let bodies = [
        (BatchMethod::Replace, json!({ "items": [{ "sku": "C" }, { "name": "no sku" }] })),
        (BatchMethod::Append, json!({ "items": [{ "sku": "C" }, { "sku": "much too long" }] })),
        (BatchMethod::Update, json!({ "items": [{ "id": 1, "name": "ok" }, { "id": 2, "shop": "two" }] })),
    ];

    for (method, body) in bodies {
        let store = seeded(initial.clone());
        let before = rows(&store);
        let schema = product_schema();

        let response = BatchHandler::new(&store, &schema)
            .execute(method, &body, &Record::new())
            .unwrap();

        assert_eq!(response.status(), 400, "{}", method);
        let BatchResponse::Errors(slots) = response else {
            panic!("expected error slots for {}", method);
        };
        assert_eq!(slots.len(), 2);
        assert!(slots[0].is_none());
        assert!(slots[1].is_some());
        assert_eq!(rows(&store), before, "{} must not write", method);
    }
}

#[test]
fn error_slots_carry_field_errors() {
    let store = seeded(json!([]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(
            BatchMethod::Append,
            &json!({ "items": [{ "name": "no sku" }, { "sku": "OK" }, "not a mapping"] }),
            &Record::new(),
        )
        .unwrap();

    assert_eq!(
        response.to_body(),
        json!({ "errors": [
            [{ "code": codes::REQUIRED, "field": "sku", "message": "This field is required." }],
            null,
            [{ "code": codes::NOT_A_MAPPING, "field": null, "message": "Invalid data. Expected a dictionary." }]
        ] })
    );
    assert!(rows(&store).is_empty());
}

#[test]
fn envelope_errors_are_reported_before_validation() {
    let store = seeded(json!([{ "sku": "A" }]));
    let schema = product_schema();

    let response = BatchHandler::new(&store, &schema)
        .execute(BatchMethod::Replace, &json!({ "items": { "sku": "B" } }), &Record::new())
        .unwrap();

    restkit::testing::assert_friendly_error(
        response.status(),
        &response.to_body(),
        restkit::testing::Expect::new()
            .code(codes::ITEMS_NOT_LIST)
            .field("items")
            .message("Invalid data, \"items\" field has to be list."),
    );
    assert_eq!(rows(&store).len(), 1);
}
