//! Test domain: a product catalog split into shops.

use restkit::schema::{Field, RecordSchema};
use restkit::store::{FieldFilterSet, Filter, InMemoryStore, RecordStore};
use restkit::Record;
use serde_json::Value;

pub fn product_schema() -> RecordSchema {
    RecordSchema::new()
        .field(Field::integer("id").read_only())
        .field(Field::string("sku").required().max_length(8))
        .field(Field::string("name").allow_blank())
        .field(Field::integer("shop").default(1))
}

pub fn shop_filters() -> FieldFilterSet {
    FieldFilterSet::new().exact("shop")
}

/// A store holding `rows` (a JSON array of objects).
pub fn seeded(rows: Value) -> InMemoryStore {
    let rows = rows
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|row| row.as_object().cloned())
        .collect();
    InMemoryStore::seeded("id", rows).unwrap()
}

/// Every stored record, in insertion order.
pub fn rows(store: &InMemoryStore) -> Vec<Value> {
    store
        .read(|c| c.find(&Filter::all()))
        .unwrap()
        .into_iter()
        .map(Value::Object)
        .collect()
}

pub fn params(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}
