//! restkit demo server
//!
//! Serves an in-memory `products` resource:
//!
//! ```text
//! curl -X POST localhost:8000/products/batch -d '{"items":[{"sku":"X","price":3}]}'
//! curl -X POST 'localhost:8000/products/search' -d '{"max_price":5}'
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use restkit::schema::{Field, FieldKind, RecordSchema};
use restkit::service::{serve, Resource, Service};
use restkit::store::{FieldFilterSet, InMemoryStore, LookupKind, StoreError};
use restkit::Settings;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn products(settings: &Settings) -> Result<Resource<InMemoryStore>, StoreError> {
    let schema = RecordSchema::new()
        .field(Field::integer("id").read_only())
        .field(Field::string("sku").required().max_length(32))
        .field(Field::string("name").allow_blank())
        .field(Field::float("price").min_value(0.0))
        .field(Field::list("tags", FieldKind::String, ",").default(json!([])));

    let filters = FieldFilterSet::new()
        .exact("sku")
        .bind("name", "name", LookupKind::IContains)
        .bind("min_price", "price", LookupKind::Gte)
        .bind("max_price", "price", LookupKind::Lte);

    let store = InMemoryStore::new("id").with_unique(&["sku"])?;
    Ok(Resource::new(store, schema)
        .filterset(filters)
        .settings(settings.batch.clone())
        .dynamic_fields())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let settings = match std::env::var("RESTKIT_CONFIG") {
        Ok(path) => Settings::from_file(path),
        Err(_) => Settings::from_env(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let products = match products(&settings) {
        Ok(products) => products,
        Err(e) => {
            error!(error = %e, "cannot set up products store");
            return ExitCode::FAILURE;
        }
    };
    let service = Arc::new(Service::new().resource("products", products));
    info!(resources = ?service.resources(), create_method = %settings.batch.create_method, "starting");

    match serve(service, &settings.server.addr()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
