//! Application error type shared by every layer.
//!
//! Repositories and services return [`AppError`] as a typed outcome; only the
//! HTTP boundary turns it into a status code via [`IntoResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::{NAME_CONSTRAINT, is_unique_violation_on_name};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request rejected at the HTTP boundary before reaching the service.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No non-expired record matches the lookup key.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A non-expired record already owns the requested name.
    #[error("{message}")]
    NameConflict { message: String, details: Value },

    /// Any repository failure that is not a missing record.
    #[error("{message}")]
    Storage { message: String, details: Value },

    /// Identifier or idempotency key could not be produced.
    #[error("{message}")]
    Generation { message: String, details: Value },

    /// The request deadline elapsed before storage answered.
    #[error("{message}")]
    Timeout { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn name_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::NameConflict {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn generation(message: impl Into<String>, details: Value) -> Self {
        Self::Generation {
            message: message.into(),
            details,
        }
    }
    pub fn timeout(message: impl Into<String>, details: Value) -> Self {
        Self::Timeout {
            message: message.into(),
            details,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.as_str(),
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message.as_str(), details)
            }
            AppError::NameConflict { message, details } => {
                (StatusCode::CONFLICT, "name_conflict", message.as_str(), details)
            }
            AppError::Storage { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                message.as_str(),
                details,
            ),
            AppError::Generation { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "generation_error",
                message.as_str(),
                details,
            ),
            AppError::Timeout { message, details } => {
                (StatusCode::GATEWAY_TIMEOUT, "timeout", message.as_str(), details)
            }
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Invalid request body", json!({ "fields": errors }))
    }
}

/// Classifies a driver error.
///
/// A unique violation on the name constraint is the storage layer's verdict on
/// a concurrent create and is reported as [`AppError::NameConflict`]. Pool
/// acquisition timeouts become [`AppError::Timeout`]. Everything else is a
/// [`AppError::Storage`] carrying the driver message.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if is_unique_violation_on_name(&e) {
        return AppError::name_conflict(
            "Name is already taken",
            json!({ "constraint": NAME_CONSTRAINT }),
        );
    }

    if matches!(e, sqlx::Error::PoolTimedOut) {
        return AppError::timeout("Timed out acquiring a database connection", json!({}));
    }

    AppError::storage("Database error", json!({ "reason": e.to_string() }))
}
