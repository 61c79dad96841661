//! Common error types and handling for Parley

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Message used for every request body that fails validation
pub const INVALID_BODY: &str = "Validation error";

/// Message used for path parameters that fail validation
pub const INVALID_PARAMS: &str = "Invalid parameters";

/// Message used for query strings that fail validation
pub const INVALID_QUERY: &str = "Invalid query parameters";

/// A single rejected input field, addressed by its dotted path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Common error type for the Parley backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Validation failure without field detail (domain rule violations)
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Validation failure for a single body field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::invalid_body(vec![FieldError::new(field, message)])
    }

    pub fn invalid_body(errors: Vec<FieldError>) -> Self {
        Error::Validation {
            message: INVALID_BODY.to_string(),
            errors,
        }
    }

    pub fn invalid_params(errors: Vec<FieldError>) -> Self {
        Error::Validation {
            message: INVALID_PARAMS.to_string(),
            errors,
        }
    }

    pub fn invalid_query(errors: Vec<FieldError>) -> Self {
        Error::Validation {
            message: INVALID_QUERY.to_string(),
            errors,
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients. Store details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation { message, .. } => message.clone(),
            Error::NotFound(message) => message.clone(),
            Error::Unexpected(_) | Error::Database(_) | Error::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors with full context
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = match self {
            Error::Validation { message, errors } => ApiResponse::failure(message, errors),
            other => ApiResponse::failure(other.public_message(), Vec::new()),
        };

        (status, Json(body)).into_response()
    }
}
