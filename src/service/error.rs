//! Error types for service dispatch.

use thiserror::Error;

use crate::batch::BatchError;

/// Errors that keep an operation from producing a reply.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No resource registered under this name.
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    /// The request body could not be decoded.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// The operation is not served on this route.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// Store or schema failure while handling the operation.
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl ServiceError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::UnknownResource(_) => 404,
            ServiceError::DecodeFailed(_) => 400,
            ServiceError::Unsupported(_) => 405,
            ServiceError::Batch(_) => 500,
        }
    }
}
