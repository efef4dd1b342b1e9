use axum::{http::StatusCode, Json};

use crate::models::ErrorResponse;

/// Error taxonomy for the payment flow.
///
/// Unknown destinations during order creation are a malformed request, not a
/// missing resource, so they map to 400 while lookup misses map to 404.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("payment signature mismatch")]
    SignatureMismatch,

    #[error("gateway error: {0}")]
    Upstream(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<ApiError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("Invalid input", details)),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg))),
            ApiError::UnknownDestination(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg)))
            }
            ApiError::SignatureMismatch => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Payment verification failed")),
            ),
            ApiError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Payment gateway error")),
            ),
            ApiError::Persistence(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(msg)))
            }
        }
    }
}
