//! Direct dispatch, without a transport.

use restkit::batch::BatchMethod;
use restkit::service::{Operation, ServiceError};
use restkit::store::{Filter, RecordStore};
use restkit::Record;
use serde_json::{json, Value};

use crate::support::service;

fn params(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn batch_replace_stays_inside_the_scope() {
    let (store, service) = service();

    let reply = service
        .dispatch(
            "products",
            Operation::Batch(BatchMethod::Replace),
            &json!({ "items": [{ "sku": "Z", "price": "2.5" }] }),
            &Record::new(),
        )
        .unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.body,
        json!({ "items": [{ "id": 4, "sku": "Z", "price": 2.5, "shop": 1 }] })
    );
    let skus: Vec<Value> = store
        .read(|c| c.find(&Filter::all()))
        .unwrap()
        .into_iter()
        .map(|r| r["sku"].clone())
        .collect();
    assert_eq!(skus, vec![json!("HIDDEN"), json!("Z")]);
}

#[test]
fn bulk_update_cannot_reach_other_scopes() {
    let (_, service) = service();

    let reply = service
        .dispatch("products", Operation::BulkUpdate, &json!([{ "id": 3, "price": 0 }]), &Record::new())
        .unwrap();
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body["errors"][0]["code"], 2951);

    let reply = service
        .dispatch("products", Operation::BulkUpdate, &json!([{ "id": 2, "price": 0 }]), &Record::new())
        .unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body[0]["price"], 0);
}

#[test]
fn search_with_dynamic_fields() {
    let (_, service) = service();

    let reply = service
        .dispatch(
            "products",
            Operation::Search,
            &json!({ "max_price": "5" }),
            &params(json!({ "fields": "id,sku" })),
        )
        .unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!([{ "id": 1, "sku": "X" }]));
}

#[test]
fn unknown_resource_is_404() {
    let (_, service) = service();
    let err = service
        .dispatch("orders", Operation::Search, &Value::Null, &Record::new())
        .unwrap_err();
    assert!(matches!(err, ServiceError::UnknownResource(ref name) if name == "orders"));
    assert_eq!(err.status_code(), 404);
}
