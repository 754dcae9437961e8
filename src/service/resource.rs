//! Resource - one store and schema exposed through the service.

use std::sync::Arc;

use serde_json::Value;

use super::{Operation, Reply};
use crate::batch::{BatchError, BatchHandler, BatchSettings};
use crate::bulk::BulkUpdateHandler;
use crate::record::Record;
use crate::schema::{DynamicFields, FieldSelection, Schema};
use crate::search::SearchHandler;
use crate::store::{Filter, FilterSet, RecordStore};

/// A store, its schema and the settings of the endpoints serving it.
pub struct Resource<S> {
    store: S,
    schema: Arc<dyn Schema>,
    scope: Filter,
    filterset: Option<Arc<dyn FilterSet>>,
    settings: BatchSettings,
    pk_field: Option<String>,
    dynamic_fields: bool,
}

impl<S: RecordStore> Resource<S> {
    pub fn new(store: S, schema: impl Schema + 'static) -> Self {
        Self {
            store,
            schema: Arc::new(schema),
            scope: Filter::all(),
            filterset: None,
            settings: BatchSettings::default(),
            pk_field: None,
            dynamic_fields: false,
        }
    }

    /// Only records matching `scope` are visible to the endpoints.
    pub fn scope(mut self, scope: Filter) -> Self {
        self.scope = scope;
        self
    }

    /// Turns request parameters into filters (batch PUT/POST and search).
    pub fn filterset(mut self, filterset: impl FilterSet + 'static) -> Self {
        self.filterset = Some(Arc::new(filterset));
        self
    }

    pub fn settings(mut self, settings: BatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Item field identifying records on bulk updates, when it is not the
    /// store's primary key.
    pub fn pk_field(mut self, pk_field: &str) -> Self {
        self.pk_field = Some(pk_field.to_string());
        self
    }

    /// Let clients trim representations with `fields` / `omit` parameters.
    pub fn dynamic_fields(mut self) -> Self {
        self.dynamic_fields = true;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn batch_settings(&self) -> &BatchSettings {
        &self.settings
    }

    pub(crate) fn handle(
        &self,
        operation: Operation,
        body: &Value,
        params: &Record,
    ) -> Result<Reply, BatchError> {
        let trimmed;
        let schema: &dyn Schema = if self.dynamic_fields {
            trimmed = DynamicFields::new(self.schema.as_ref(), FieldSelection::from_params(params));
            &trimmed
        } else {
            self.schema.as_ref()
        };

        match operation {
            Operation::Batch(method) => {
                let mut handler = BatchHandler::new(&self.store, schema)
                    .scope(self.scope.clone())
                    .settings(self.settings.clone());
                if let Some(filterset) = self.filterset.as_deref() {
                    handler = handler.filterset(filterset);
                }
                let response = handler.execute(method, body, params)?;
                Ok(Reply::new(response.status(), response.to_body()))
            }
            Operation::BulkUpdate => {
                let mut handler =
                    BulkUpdateHandler::new(&self.store, schema).scope(self.scope.clone());
                if let Some(pk_field) = &self.pk_field {
                    handler = handler.pk_field(pk_field);
                }
                let response = handler.execute(body)?;
                Ok(Reply::new(response.status(), response.to_body()))
            }
            Operation::Search => {
                let mut handler = SearchHandler::new(&self.store, schema).scope(self.scope.clone());
                if let Some(filterset) = self.filterset.as_deref() {
                    handler = handler.filterset(filterset);
                }
                let response = handler.execute(body)?;
                Ok(Reply::new(response.status(), response.to_body()))
            }
        }
    }
}
