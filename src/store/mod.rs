//! Record stores - the persisted collections endpoints operate on.
//!
//! A store exposes one collection of records. Reads go through
//! [`RecordStore::read`]; every write goes through [`RecordStore::atomic`],
//! which either publishes all of the closure's changes or none of them.
//!
//! ## Example
//!
//! ```
//! use restkit::store::{Filter, InMemoryStore, RecordStore, StoreError};
//! use serde_json::json;
//!
//! let store = InMemoryStore::new("id");
//! store
//!     .atomic(|tx| -> Result<(), StoreError> {
//!         tx.create(json!({ "sku": "X" }).as_object().cloned().unwrap_or_default())?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let all = store.read(|c| c.find(&Filter::all())).unwrap();
//! assert_eq!(all.len(), 1);
//! ```

mod filter;
mod filterset;
mod in_memory;

use serde_json::Value;
use thiserror::Error;

use crate::record::Record;

pub use filter::{Condition, Filter, Lookup};
pub use filterset::{FieldFilterSet, FilterSet, LookupKind};
pub use in_memory::InMemoryStore;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with the same primary key or unique field already exists.
    #[error("duplicate value for {field}: {value}")]
    Duplicate { field: String, value: String },
    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
    /// A value cannot serve as primary key.
    #[error("invalid primary key: {0}")]
    InvalidKey(String),
    /// Lock poisoned by a panicking writer.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Storage-level error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Operations on one collection of records.
///
/// `scope` arguments restrict lookups to the records an endpoint is allowed
/// to see.
pub trait Collection {
    /// Name of the primary-key field.
    fn pk_field(&self) -> &str;

    /// Get the record with the given primary key inside `scope`.
    fn get(&self, scope: &Filter, pk: &Value) -> Result<Option<Record>, StoreError>;

    /// All records matching `filter`, in insertion order.
    fn find(&self, filter: &Filter) -> Result<Vec<Record>, StoreError>;

    /// Insert a new record. Fails on duplicate primary key or unique field.
    fn create(&mut self, fields: Record) -> Result<Record, StoreError>;

    /// Return the record in `scope` whose fields all equal `fields`,
    /// creating it when there is none.
    fn get_or_create(&mut self, scope: &Filter, fields: Record) -> Result<Record, StoreError>;

    /// Overwrite the given fields of an existing record.
    fn update(&mut self, pk: &Value, changes: Record) -> Result<Record, StoreError>;

    /// Delete every record matching `filter` whose primary key is not in
    /// `keep`. Returns the number of deleted records.
    fn delete_excluding(&mut self, filter: &Filter, keep: &[Value]) -> Result<usize, StoreError>;
}

/// A store holding one collection.
pub trait RecordStore: Send + Sync {
    /// Run read-only work against the collection.
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn Collection) -> Result<T, StoreError>;

    /// Run `f` as one transaction. Changes become visible only when `f`
    /// returns `Ok`; on `Err` the collection is left untouched.
    fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn Collection) -> Result<T, E>;
}
