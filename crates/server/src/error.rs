//! Error mapping for the HTTP surface.
//!
//! Generation is all-or-nothing: any failure surfaces as one generic
//! response carrying the error's description as plain text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request itself is unusable (no upload field, bad multipart).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Anything that failed while generating the report.
    #[error("Report generation failed: {0}")]
    Generation(#[from] clipdeck_core::Error),

    /// Worker or runtime failure outside the pipeline itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
