//! HTTP error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::error::DictionaryError;
use crate::storage::StorageError;

/// Errors a request handler can end with
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body or path could not be understood
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// The mutation succeeded in memory but could not be written
    #[error("Failed to save dictionary: {0}")]
    Storage(#[from] StorageError),

    /// Store work died before producing a result
    #[error("Internal server error")]
    Internal,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dictionary(err) => match err {
                DictionaryError::Validation(_) => StatusCode::BAD_REQUEST,
                DictionaryError::Duplicate { .. } => StatusCode::CONFLICT,
                DictionaryError::OutOfRange { .. } => StatusCode::NOT_FOUND,
                DictionaryError::AlreadyRegistered => StatusCode::CONFLICT,
                DictionaryError::NotRegistered => StatusCode::UNAUTHORIZED,
                DictionaryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            },
            ApiError::Storage(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;
