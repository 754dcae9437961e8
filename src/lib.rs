//! restkit - batch, bulk-update and search endpoints over record stores.
//!
//! - [`batch`]: `PUT` / `POST` / `PATCH` of many items in one request,
//!   validated up front and committed in one transaction.
//! - [`bulk`]: strict all-or-nothing update by primary key.
//! - [`search`]: filtered listing driven by the request body.
//! - [`service`]: named resources, dispatch and the axum transport.
//!
//! Request problems come back as [`friendly`] error payloads.

extern crate self as restkit;

pub mod batch;
pub mod bulk;
pub mod choices;
pub mod config;
pub mod dates;
pub mod forms;
pub mod friendly;
pub mod i18n;
pub mod record;
pub mod schema;
pub mod search;
pub mod service;
pub mod session;
pub mod store;
pub mod testing;
pub mod text;
pub mod validators;

pub use batch::{BatchError, BatchHandler, BatchMethod, BatchResponse, BatchSettings, CreateMethod};
pub use bulk::{BulkResponse, BulkUpdateHandler};
pub use choices::ChoiceEnum;
pub use config::{ConfigError, Settings};
pub use friendly::{ErrorPayload, FieldError};
pub use record::Record;
pub use schema::{Field, RecordSchema, Schema};
pub use search::{SearchHandler, SearchResponse};
pub use service::{Operation, Reply, Resource, Service, ServiceError};
pub use store::{Filter, InMemoryStore, RecordStore, StoreError};

// Derive macro for ChoiceEnum
pub use restkit_macros::ChoiceEnum;
