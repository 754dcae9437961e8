//! BatchHandler - validate every item, then commit them in one transaction.

use serde_json::Value;
use tracing::{debug, info};

use super::{BatchError, BatchMethod, BatchResponse, BatchSettings, CreateMethod};
use crate::friendly::{codes, ErrorPayload, FieldError};
use crate::record::Record;
use crate::schema::Schema;
use crate::store::{Filter, FilterSet, RecordStore};

/// Handles one batch request against a store.
///
/// Built per request from borrowed parts; cheap to construct.
pub struct BatchHandler<'a, S> {
    store: &'a S,
    schema: &'a dyn Schema,
    scope: Filter,
    filterset: Option<&'a dyn FilterSet>,
    settings: BatchSettings,
}

impl<'a, S: RecordStore> BatchHandler<'a, S> {
    pub fn new(store: &'a S, schema: &'a dyn Schema) -> Self {
        Self {
            store,
            schema,
            scope: Filter::all(),
            filterset: None,
            settings: BatchSettings::default(),
        }
    }

    /// Restrict the handler to the records matching `scope`.
    pub fn scope(mut self, scope: Filter) -> Self {
        self.scope = scope;
        self
    }

    /// Narrow PUT/POST collections by request parameters.
    pub fn filterset(mut self, filterset: &'a dyn FilterSet) -> Self {
        self.filterset = Some(filterset);
        self
    }

    pub fn settings(mut self, settings: BatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run the batch.
    ///
    /// `params` are the request's filter parameters (query string).
    pub fn execute(
        &self,
        method: BatchMethod,
        body: &Value,
        params: &Record,
    ) -> Result<BatchResponse, BatchError> {
        let items = match self.items(body) {
            Ok(items) => items,
            Err(payload) => {
                debug!(%method, reason = %payload.errors[0].message, "batch request rejected");
                return Ok(BatchResponse::Invalid(payload));
            }
        };

        // Validate all before touching the store.
        let mut cleaned = Vec::with_capacity(items.len());
        let mut slots = Vec::with_capacity(items.len());
        let mut any_error = false;
        for item in items {
            match self.schema.validate(item, method.is_partial()) {
                Ok(fields) => {
                    cleaned.push(fields);
                    slots.push(None);
                }
                Err(errors) => {
                    any_error = true;
                    slots.push(Some(errors));
                }
            }
        }
        if any_error {
            debug!(%method, items = items.len(), "batch validation failed");
            return Ok(BatchResponse::Errors(slots));
        }

        let filter = match method {
            BatchMethod::Replace | BatchMethod::Append => match self.request_filter(params) {
                Ok(filter) => self.scope.clone().and(filter),
                Err(errors) => return Ok(BatchResponse::Invalid(ErrorPayload::validation_failed(errors))),
            },
            BatchMethod::Update => self.scope.clone(),
        };

        let (results, deleted) = match method {
            BatchMethod::Replace | BatchMethod::Append => self.create_all(method, cleaned, &filter)?,
            BatchMethod::Update => (self.update_all(items, cleaned)?, 0),
        };

        info!(
            %method,
            items = results.len(),
            skipped = results.iter().filter(|r| r.is_none()).count(),
            deleted,
            "batch committed"
        );
        Ok(BatchResponse::Items(results))
    }

    /// Extract the `items` list, or the payload explaining why it can't be.
    fn items<'b>(&self, body: &'b Value) -> Result<&'b [Value], ErrorPayload> {
        let Some(data) = body.as_object() else {
            return Err(ErrorPayload::single(
                codes::NOT_A_MAPPING,
                None,
                "Invalid data, request body has to be a mapping.",
            ));
        };

        let items = match data.get("items") {
            None | Some(Value::Null) => {
                return Err(ErrorPayload::single(
                    codes::MISSING_ITEMS,
                    Some("items"),
                    "Invalid data, missing \"items\" field in data.",
                ))
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ErrorPayload::single(
                    codes::ITEMS_NOT_LIST,
                    Some("items"),
                    "Invalid data, \"items\" field has to be list.",
                ))
            }
        };

        if items.is_empty() && !self.settings.allow_empty_items {
            return Err(ErrorPayload::single(
                codes::EMPTY_ITEMS,
                Some("items"),
                "Invalid data, \"items\" list is empty.",
            ));
        }

        Ok(items)
    }

    fn request_filter(&self, params: &Record) -> Result<Filter, Vec<FieldError>> {
        match self.filterset {
            Some(filterset) => filterset.filter(params),
            None => Ok(Filter::all()),
        }
    }

    /// PUT/POST commit: create each item, then for PUT delete every filtered
    /// record that was not part of the submission.
    fn create_all(
        &self,
        method: BatchMethod,
        cleaned: Vec<Record>,
        filter: &Filter,
    ) -> Result<(Vec<Option<Value>>, usize), BatchError> {
        self.store.atomic(|tx| -> Result<(Vec<Option<Value>>, usize), BatchError> {
            let pk_field = tx.pk_field().to_string();
            let mut kept = Vec::with_capacity(cleaned.len());
            let mut results = Vec::with_capacity(cleaned.len());

            for fields in cleaned {
                let record = match self.settings.create_method {
                    CreateMethod::Create => tx.create(fields)?,
                    CreateMethod::GetOrCreate => tx.get_or_create(filter, fields)?,
                };
                if let Some(pk) = record.get(&pk_field) {
                    kept.push(pk.clone());
                }
                results.push(Some(self.schema.represent(&record)?));
            }

            let deleted = if method == BatchMethod::Replace {
                tx.delete_excluding(filter, &kept)?
            } else {
                0
            };

            Ok((results, deleted))
        })
    }

    /// PATCH commit: update items whose primary key matches a record in
    /// scope; everything else becomes a `null` slot.
    fn update_all(
        &self,
        items: &[Value],
        cleaned: Vec<Record>,
    ) -> Result<Vec<Option<Value>>, BatchError> {
        self.store.atomic(|tx| -> Result<Vec<Option<Value>>, BatchError> {
            let pk_field = tx.pk_field().to_string();
            let mut results = Vec::with_capacity(items.len());

            for (item, changes) in items.iter().zip(cleaned) {
                let pk = item
                    .as_object()
                    .and_then(|fields| fields.get(&pk_field))
                    .filter(|pk| !pk.is_null());

                let Some(pk) = pk else {
                    results.push(None);
                    continue;
                };
                if tx.get(&self.scope, pk)?.is_none() {
                    debug!(pk = %pk, "batch update skipped unknown record");
                    results.push(None);
                    continue;
                }

                let record = tx.update(pk, changes)?;
                results.push(Some(self.schema.represent(&record)?));
            }

            Ok(results)
        })
    }
}
