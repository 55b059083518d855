//! Typed error handling for the invoice API
//!
//! Three caller-visible categories, mapped to HTTP status codes:
//!
//! - [`ValidationError`]: client-caused rejections (400), recoverable by
//!   resubmitting corrected data
//! - not-found: update/delete targeting a nonexistent invoice number (404)
//! - [`StorageError`] / [`ConfigError`] / internal: infrastructure failures
//!   (500), logged server-side and reported with a generic message
//!
//! No retries are attempted anywhere; every failure surfaces immediately.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the invoice API.
#[derive(Debug)]
pub enum ApiError {
    /// Creation rejected by the validation rules
    Validation(ValidationError),

    /// Update/delete targeted a nonexistent invoice number
    NotFound { invoice_number: String },

    /// Storage backend failure
    Storage(StorageError),

    /// Configuration failure
    Config(ConfigError),

    /// Unexpected internal error
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::NotFound { .. } => write!(f, "Invoice not found"),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error body returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.error_code(),
            ApiError::NotFound { .. } => "INVOICE_NOT_FOUND",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build the HTTP response body.
    ///
    /// Infrastructure failures are collapsed into a generic message: the
    /// caller cannot distinguish a store outage from any other server fault.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::NotFound { .. } => "Invoice not found".to_string(),
            _ => "Internal server error".to_string(),
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Creation-time validation rejections.
#[derive(Debug)]
pub enum ValidationError {
    /// Number already used for the financial year, or the date does not fit
    /// the chronological slot. Reported as one combined reason.
    InvoiceRejected,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvoiceRejected => write!(
                f,
                "Invoice number already used for this financial year or invalid invoice date"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvoiceRejected => "INVOICE_REJECTED",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends.
#[derive(Debug)]
pub enum StorageError {
    /// Failed to reach the backend
    Connection { backend: String, message: String },

    /// A read or write against the backend failed
    Query { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Connection { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::Query { message } => {
                write!(f, "Storage query error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse a configuration file
    Parse {
        file: Option<String>,
        message: String,
    },

    /// A field holds an unusable value
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    Io { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::Io { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

/// Store trait methods report failures via `anyhow`; at the service boundary
/// those collapse into the storage category.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage(StorageError::Query {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for invoice API operations.
pub type ApiResult<T> = Result<T, ApiError>;
