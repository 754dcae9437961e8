//! Test domain: a `products` resource scoped to one shop.

use restkit::schema::{Field, RecordSchema};
use restkit::service::{Resource, Service};
use restkit::store::{FieldFilterSet, Filter, InMemoryStore, LookupKind};
use serde_json::json;

pub fn product_schema() -> RecordSchema {
    RecordSchema::new()
        .field(Field::integer("id").read_only())
        .field(Field::string("sku").required())
        .field(Field::float("price").min_value(0.0))
        .field(Field::integer("shop").default(1))
}

/// Products of shop 1, plus one product of shop 2 that the resource must
/// never see.
pub fn products() -> (InMemoryStore, Resource<InMemoryStore>) {
    let rows = [
        json!({ "sku": "X", "price": 3.0, "shop": 1 }),
        json!({ "sku": "Y", "price": 8.0, "shop": 1 }),
        json!({ "sku": "HIDDEN", "price": 1.0, "shop": 2 }),
    ]
    .into_iter()
    .filter_map(|row| row.as_object().cloned())
    .collect();
    let store = InMemoryStore::seeded("id", rows).unwrap();

    let filters = FieldFilterSet::new()
        .exact("sku")
        .bind("max_price", "price", LookupKind::Lte);

    let resource = Resource::new(store.clone(), product_schema())
        .scope(Filter::all().eq("shop", 1))
        .filterset(filters)
        .dynamic_fields();
    (store, resource)
}

pub fn service() -> (InMemoryStore, Service<InMemoryStore>) {
    let (store, resource) = products();
    (store, Service::new().resource("products", resource))
}
