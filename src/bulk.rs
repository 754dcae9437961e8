//! Bulk update - update many records by primary key, all or nothing.
//!
//! Unlike the batch endpoint's `PATCH`, a single bad item (not a mapping,
//! missing or unknown key, failed validation) rejects the whole request.

use serde_json::Value;
use tracing::{debug, info};

use crate::batch::BatchError;
use crate::friendly::{codes, ErrorPayload};
use crate::record::Record;
use crate::schema::Schema;
use crate::store::{Filter, RecordStore};

/// Outcome of a bulk update.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkResponse {
    /// Every item was updated; representations in input order.
    Updated(Vec<Value>),
    /// Nothing was updated.
    Rejected(ErrorPayload),
}

impl BulkResponse {
    pub fn status(&self) -> u16 {
        match self {
            BulkResponse::Updated(_) => 200,
            BulkResponse::Rejected(_) => 400,
        }
    }

    pub fn to_body(&self) -> Value {
        match self {
            BulkResponse::Updated(items) => Value::Array(items.clone()),
            BulkResponse::Rejected(payload) => payload.to_value(),
        }
    }
}

/// Handles a bulk update request: a JSON list of partial items, each
/// carrying its primary key.
pub struct BulkUpdateHandler<'a, S> {
    store: &'a S,
    schema: &'a dyn Schema,
    scope: Filter,
    pk_field: Option<String>,
}

/// Why an item aborted the request. Only used for logging.
enum Abort {
    NotAMapping,
    MissingKey,
    UnknownKey,
    AmbiguousKey,
    Invalid,
}

impl Abort {
    fn reason(&self) -> &'static str {
        match self {
            Abort::NotAMapping => "item is not a mapping",
            Abort::MissingKey => "item has no primary key",
            Abort::UnknownKey => "no record with that primary key",
            Abort::AmbiguousKey => "key field matches more than one record",
            Abort::Invalid => "item failed validation",
        }
    }
}

impl<'a, S: RecordStore> BulkUpdateHandler<'a, S> {
    pub fn new(store: &'a S, schema: &'a dyn Schema) -> Self {
        Self {
            store,
            schema,
            scope: Filter::all(),
            pk_field: None,
        }
    }

    pub fn scope(mut self, scope: Filter) -> Self {
        self.scope = scope;
        self
    }

    /// Field identifying each item's record. Defaults to the store's
    /// primary-key field; any other field must match exactly one record
    /// in scope.
    pub fn pk_field(mut self, pk_field: &str) -> Self {
        self.pk_field = Some(pk_field.to_string());
        self
    }

    pub fn execute(&self, body: &Value) -> Result<BulkResponse, BatchError> {
        let Some(items) = body.as_array() else {
            debug!("bulk update rejected: body is not a list");
            return Ok(BulkResponse::Rejected(ErrorPayload::single(
                codes::EXPECTED_LIST,
                None,
                "Expected list of dictionaries.",
            )));
        };

        let outcome = self.store.atomic(|tx| -> Result<Result<Vec<Value>, Abort>, BatchError> {
            let store_pk = tx.pk_field().to_string();
            let key_field = self.pk_field.clone().unwrap_or_else(|| store_pk.clone());
            let mut planned = Vec::with_capacity(items.len());
            for item in items {
                let Some(fields) = item.as_object() else {
                    return Ok(Err(Abort::NotAMapping));
                };
                let mut fields: Record = fields.clone();
                let key = match fields.remove(&key_field) {
                    Some(key) if !key.is_null() => key,
                    _ => return Ok(Err(Abort::MissingKey)),
                };

                let pk = if key_field == store_pk {
                    tx.get(&self.scope, &key)?.map(|_| key)
                } else {
                    let mut matches = tx.find(&self.scope.clone().eq(key_field.as_str(), key))?;
                    if matches.len() > 1 {
                        return Ok(Err(Abort::AmbiguousKey));
                    }
                    matches.pop().and_then(|record| record.get(&store_pk).cloned())
                };
                let Some(pk) = pk else {
                    return Ok(Err(Abort::UnknownKey));
                };
                match self.schema.validate(&Value::Object(fields), true) {
                    Ok(changes) => planned.push((pk, changes)),
                    Err(_) => return Ok(Err(Abort::Invalid)),
                }
            }

            let mut updated = Vec::with_capacity(planned.len());
            for (pk, changes) in planned {
                let record = tx.update(&pk, changes)?;
                updated.push(self.schema.represent(&record)?);
            }
            Ok(Ok(updated))
        })?;

        match outcome {
            Ok(updated) => {
                info!(items = updated.len(), "bulk update committed");
                Ok(BulkResponse::Updated(updated))
            }
            Err(abort) => {
                debug!(reason = abort.reason(), "bulk update rejected");
                Ok(BulkResponse::Rejected(ErrorPayload::single(
                    codes::BULK_ACTION_FAILED,
                    None,
                    "Error in data for bulk action.",
                )))
            }
        }
    }
}
