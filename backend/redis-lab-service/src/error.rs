/// Error types for redis-lab-service
///
/// Every failure leaves the service as an `ErrorResponse` JSON envelope with
/// an HTTP status derived from the error variant.
use actix_web::{
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::data_structures::StoreError;

/// Result type for redis-lab-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Standard error body returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> (&'static str, &'static str) {
        match self {
            AppError::Store(StoreError::Communication(_)) => {
                ("server_error", "REDIS_UNAVAILABLE")
            }
            AppError::Store(StoreError::WrongType(_)) => ("conflict_error", "WRONG_TYPE"),
            AppError::Store(StoreError::InvalidArgument(_)) => {
                ("validation_error", "INVALID_ARGUMENT")
            }
            AppError::Store(StoreError::Command(_)) => ("server_error", "REDIS_COMMAND_FAILED"),
            AppError::Database(_) => ("server_error", "DATABASE_ERROR"),
            AppError::Validation(_) => ("validation_error", "VALIDATION_ERROR"),
            AppError::BadRequest(_) => ("validation_error", "INVALID_REQUEST"),
            AppError::NotFound(_) => ("not_found_error", "NOT_FOUND"),
            AppError::Internal(_) => ("server_error", "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Communication(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::WrongType(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Command(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (error_type, code) = self.kind();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::warn!(code, status = status.as_u16(), error = %message, "request rejected");
        }

        let response = ErrorResponse::new(
            status.canonical_reason().unwrap_or("Error"),
            &message,
            status.as_u16(),
            error_type,
            code,
        );

        HttpResponse::build(status).json(response)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

fn bad_request(message: String) -> actix_web::Error {
    let response = AppError::BadRequest(message).error_response();
    InternalError::from_response("invalid request input", response).into()
}

/// Render malformed JSON bodies in the standard error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("invalid JSON body: {err}"))
}

/// Render malformed query strings in the standard error envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("invalid query parameters: {err}"))
}

/// Render unparseable path segments in the standard error envelope.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("invalid path parameter: {err}"))
}
