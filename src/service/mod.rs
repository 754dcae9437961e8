//! Service - a registry of resources and the endpoints they expose.
//!
//! Each registered [`Resource`] bundles a store, a schema and the knobs of
//! its endpoints (scope, filterset, batch settings). The service routes an
//! [`Operation`] on a named resource to the matching handler and turns the
//! outcome into a [`Reply`].
//!
//! ## Example
//!
//! ```
//! use restkit::batch::BatchMethod;
//! use restkit::schema::{Field, RecordSchema};
//! use restkit::service::{Operation, Resource, Service};
//! use restkit::store::InMemoryStore;
//! use serde_json::json;
//!
//! let schema = RecordSchema::new()
//!     .field(Field::integer("id").read_only())
//!     .field(Field::string("sku").required());
//! let service = Service::new().resource("products", Resource::new(InMemoryStore::new("id"), schema));
//!
//! let reply = service
//!     .dispatch(
//!         "products",
//!         Operation::Batch(BatchMethod::Append),
//!         &json!({ "items": [{ "sku": "X" }] }),
//!         &Default::default(),
//!     )
//!     .unwrap();
//! assert_eq!(reply.status, 200);
//!
//! // HTTP transport (requires "http" feature)
//! // restkit::service::serve(std::sync::Arc::new(service), "0.0.0.0:3000").await?;
//! ```

mod error;
mod resource;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::batch::BatchMethod;
use crate::record::Record;
use crate::store::RecordStore;

pub use error::ServiceError;
pub use resource::Resource;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// An endpoint operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `PUT|POST|PATCH /:resource/batch`
    Batch(BatchMethod),
    /// `PATCH /:resource/bulk`
    BulkUpdate,
    /// `POST /:resource/search`
    Search,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Batch(method) => write!(f, "batch {}", method),
            Operation::BulkUpdate => f.write_str("bulk update"),
            Operation::Search => f.write_str("search"),
        }
    }
}

/// HTTP-style status and JSON body of a handled operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Named resources over stores of type `S`.
pub struct Service<S> {
    resources: HashMap<String, Resource<S>>,
}

impl<S> Default for Service<S> {
    fn default() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }
}

impl<S: RecordStore + 'static> Service<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under `name`, replacing any previous one.
    pub fn resource(mut self, name: &str, resource: Resource<S>) -> Self {
        self.resources.insert(name.to_string(), resource);
        self
    }

    /// Run `operation` on the named resource.
    ///
    /// `params` are the request parameters (query string).
    pub fn dispatch(
        &self,
        resource: &str,
        operation: Operation,
        body: &Value,
        params: &Record,
    ) -> Result<Reply, ServiceError> {
        let target = self
            .resources
            .get(resource)
            .ok_or_else(|| ServiceError::UnknownResource(resource.to_string()))?;

        let reply = target.handle(operation, body, params)?;
        debug!(resource, %operation, status = reply.status, "dispatched");
        Ok(reply)
    }

    /// Registered resource names, sorted.
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn get(&self, name: &str) -> Option<&Resource<S>> {
        self.resources.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordSchema;
    use crate::store::InMemoryStore;
    use serde_json::json;

    #[test]
    fn unknown_resource() {
        let service: Service<InMemoryStore> = Service::new();
        let err = service
            .dispatch("nope", Operation::Search, &Value::Null, &Record::new())
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "unknown resource: nope");
    }

    #[test]
    fn lists_resources() {
        let service = Service::new()
            .resource("b", Resource::new(InMemoryStore::new("id"), RecordSchema::new()))
            .resource("a", Resource::new(InMemoryStore::new("id"), RecordSchema::new()));
        assert_eq!(service.resources(), vec!["a", "b"]);
        assert!(service.get("a").is_some());
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::Batch(BatchMethod::Replace).to_string(), "batch PUT");
        assert_eq!(Operation::BulkUpdate.to_string(), "bulk update");
        assert_eq!(Reply::new(200, json!([])).status, 200);
    }
}
