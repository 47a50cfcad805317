//! # API Errors
//!
//! The single normalization step between handler failures and clients.
//! Raw store, geocoder and query-parsing failures convert into [`ApiError`]
//! through `From`, and `IntoResponse` renders the error envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::query::QueryError;
use super::response::ErrorEnvelope;
use crate::geocoder::GeocodeError;
use crate::store::StoreError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Client message for unclassified failures
pub const INTERNAL_MESSAGE: &str = "Server Error";

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Resource (or route) not found
    #[error("{0}")]
    NotFound(String),

    /// Schema validation failed, one message per field
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Unique constraint violated
    #[error("Duplicate value entered")]
    Conflict,

    /// Malformed request (query, path or body)
    #[error("{0}")]
    BadRequest(String),

    /// Known path, unsupported method
    #[error("Method not allowed")]
    MethodNotAllowed,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Geocoding provider failed or found nothing
    #[error("Geocoding failed: {0}")]
    ExternalService(String),

    /// Anything else; never shown to clients
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(id) => ApiError::NotFound(format!("Resource not found with id of {}", id)),
            StoreError::Validation(details) => {
                ApiError::Validation(details.into_iter().map(|d| d.message).collect())
            }
            StoreError::DuplicateKey { .. } => {
                tracing::debug!(error = %err, "unique constraint violated");
                ApiError::Conflict
            }
            StoreError::MissingReference { id, .. } => {
                ApiError::NotFound(format!("No bootcamp with the id of {}", id))
            }
            StoreError::Backend(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        ApiError::ExternalService(err.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal(detail) => tracing::error!(error = %detail, "request failed"),
            ApiError::ExternalService(detail) => tracing::error!(error = %detail, "geocoder failed"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "request rejected"),
        }
        (status, Json(ErrorEnvelope::new(self.client_message()))).into_response()
    }
}
