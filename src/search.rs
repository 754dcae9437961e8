//! Search - list the records matching a filter sent in the request body.

use serde_json::Value;
use tracing::debug;

use crate::batch::BatchError;
use crate::friendly::{codes, ErrorPayload};
use crate::record::Record;
use crate::schema::Schema;
use crate::store::{Filter, FilterSet, RecordStore};

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    Found(Vec<Value>),
    Invalid(ErrorPayload),
}

impl SearchResponse {
    pub fn status(&self) -> u16 {
        match self {
            SearchResponse::Found(_) => 200,
            SearchResponse::Invalid(_) => 400,
        }
    }

    pub fn to_body(&self) -> Value {
        match self {
            SearchResponse::Found(items) => Value::Array(items.clone()),
            SearchResponse::Invalid(payload) => payload.to_value(),
        }
    }
}

/// Runs a search against a store. Without a filterset every record in
/// scope matches.
pub struct SearchHandler<'a, S> {
    store: &'a S,
    schema: &'a dyn Schema,
    scope: Filter,
    filterset: Option<&'a dyn FilterSet>,
}

impl<'a, S: RecordStore> SearchHandler<'a, S> {
    pub fn new(store: &'a S, schema: &'a dyn Schema) -> Self {
        Self {
            store,
            schema,
            scope: Filter::all(),
            filterset: None,
        }
    }

    pub fn scope(mut self, scope: Filter) -> Self {
        self.scope = scope;
        self
    }

    pub fn filterset(mut self, filterset: &'a dyn FilterSet) -> Self {
        self.filterset = Some(filterset);
        self
    }

    pub fn execute(&self, body: &Value) -> Result<SearchResponse, BatchError> {
        let empty = Record::new();
        let params = match body {
            Value::Object(params) => params,
            Value::Null => &empty,
            _ => {
                return Ok(SearchResponse::Invalid(ErrorPayload::single(
                    codes::NOT_A_MAPPING,
                    None,
                    "Invalid data, request body has to be a mapping.",
                )))
            }
        };

        let filter = match self.filterset.map(|f| f.filter(params)) {
            Some(Ok(filter)) => self.scope.clone().and(filter),
            Some(Err(errors)) => {
                debug!(errors = errors.len(), "search filter rejected");
                return Ok(SearchResponse::Invalid(ErrorPayload::validation_failed(errors)));
            }
            None => self.scope.clone(),
        };

        let records = self.store.read(|c| c.find(&filter))?;
        let found = records
            .iter()
            .map(|record| self.schema.represent(record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(found = found.len(), "search finished");
        Ok(SearchResponse::Found(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordSchema;
    use crate::store::{FieldFilterSet, InMemoryStore, LookupKind};
    use serde_json::json;

    fn store() -> InMemoryStore {
        let rows = [json!({ "name": "mug", "price": 5 }), json!({ "name": "plate", "price": 12 })]
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        InMemoryStore::seeded("id", rows).unwrap()
    }

    #[test]
    fn filters_by_body() {
        let store = store();
        let schema = RecordSchema::new();
        let filters = FieldFilterSet::new().bind("min_price", "price", LookupKind::Gte);

        let response = SearchHandler::new(&store, &schema)
            .filterset(&filters)
            .execute(&json!({ "min_price": 10 }))
            .unwrap();
        assert_eq!(
            response,
            SearchResponse::Found(vec![json!({ "id": 2, "name": "plate", "price": 12 })])
        );
    }

    #[test]
    fn invalid_filter_values() {
        let store = store();
        let schema = RecordSchema::new();
        let filters = FieldFilterSet::new().bind("min_price", "price", LookupKind::Gte);

        let response = SearchHandler::new(&store, &schema)
            .filterset(&filters)
            .execute(&json!({ "min_price": "lots" }))
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[test]
    fn scope_without_filterset() {
        let store = store();
        let schema = RecordSchema::new();
        let response = SearchHandler::new(&store, &schema)
            .scope(Filter::all().eq("name", "mug"))
            .execute(&Value::Null)
            .unwrap();
        assert_eq!(response.to_body(), json!([{ "id": 1, "name": "mug", "price": 5 }]));

        let response = SearchHandler::new(&store, &schema)
            .execute(&json!("nope"))
            .unwrap();
        assert_eq!(response.status(), 400);
    }
}
