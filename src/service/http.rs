//! HTTP transport for the service - maps HTTP requests to resource operations.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `PUT|POST|PATCH /:resource/batch` - batch replace / append / update.
//! - `PATCH /:resource/bulk` - all-or-nothing bulk update.
//! - `POST /:resource/search` - filtered listing.
//! - `GET /health` - health check returning `{ "ok": true, "resources": [...] }`.
//!
//! The query string becomes the request parameters. Bodies are JSON, or
//! `application/x-www-form-urlencoded` decoded into a mapping of strings.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use restkit::service::{self, Resource, Service};
//!
//! let service = Arc::new(Service::new().resource("products", products));
//!
//! // Get the router to compose with other axum routes
//! let app = service::router(service.clone());
//!
//! // Or serve directly
//! service::serve(service, "0.0.0.0:3000").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{Operation, Service, ServiceError};
use crate::batch::BatchMethod;
use crate::record::Record;
use crate::store::RecordStore;

/// Build an axum `Router` serving every resource of the given service.
pub fn router<S: RecordStore + 'static>(service: Arc<Service<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/:resource/batch",
            put(batch_handler).post(batch_handler).patch(batch_handler),
        )
        .route("/:resource/bulk", patch(bulk_handler))
        .route("/:resource/search", post(search_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: RecordStore + 'static>(
    service: Arc<Service<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

/// `GET /health` - returns `{ "ok": true, "resources": [...] }`.
async fn health_handler<S: RecordStore + 'static>(
    State(service): State<Arc<Service<S>>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "resources": service.resources() }))
}

async fn batch_handler<S: RecordStore + 'static>(
    State(service): State<Arc<Service<S>>>,
    method: Method,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let operation = match method.as_str().parse::<BatchMethod>() {
        Ok(method) => Operation::Batch(method),
        Err(e) => return error_response(ServiceError::Unsupported(e)),
    };
    run(&service, &resource, operation, &params, &headers, &body)
}

async fn bulk_handler<S: RecordStore + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    run(&service, &resource, Operation::BulkUpdate, &params, &headers, &body)
}

async fn search_handler<S: RecordStore + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    run(&service, &resource, Operation::Search, &params, &headers, &body)
}

fn run<S: RecordStore + 'static>(
    service: &Service<S>,
    resource: &str,
    operation: Operation,
    params: &HashMap<String, String>,
    headers: &HeaderMap,
    body: &[u8],
) -> Response {
    let body = match decode_body(headers, body) {
        Ok(body) => body,
        Err(e) => return error_response(e),
    };
    let params: Record = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    match service.dispatch(resource, operation, &body, &params) {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
            (status, Json(reply.body)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Decode a request body. An empty body decodes to `null`.
fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, ServiceError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        // Repeated keys: the last value wins.
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ServiceError::DecodeFailed(e.to_string()))?;
        let form: Record = pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        return Ok(Value::Object(form));
    }

    serde_json::from_slice(body).map_err(|e| ServiceError::DecodeFailed(e.to_string()))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(error = %err, "request failed");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
