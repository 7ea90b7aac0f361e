// --- File: crates/inkwell_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared across all Inkwell crates.
///
/// Each crate keeps its own specific error enum and implements
/// `From<SpecificError> for InkwellError` so handlers can map everything to
/// an HTTP status through one trait.
#[derive(Error, Debug)]
pub enum InkwellError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for InkwellError {
    fn status_code(&self) -> u16 {
        match self {
            InkwellError::HttpError(_) => 500,
            InkwellError::ParseError(_) => 400,
            InkwellError::ConfigError(_) => 500,
            InkwellError::ValidationError(_) => 400,
            InkwellError::DatabaseError(_) => 500,
            InkwellError::ExternalServiceError { .. } => 502,
            InkwellError::ConflictError(_) => 409,
            InkwellError::NotFoundError(_) => 404,
            InkwellError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for InkwellError {
    fn from(err: reqwest::Error) -> Self {
        InkwellError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for InkwellError {
    fn from(err: serde_json::Error) -> Self {
        InkwellError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for InkwellError {
    fn from(err: std::io::Error) -> Self {
        InkwellError::InternalError(err.to_string())
    }
}

// Utility constructors for error handling
pub fn config_error<T: fmt::Display>(message: T) -> InkwellError {
    InkwellError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> InkwellError {
    InkwellError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> InkwellError {
    InkwellError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> InkwellError {
    InkwellError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> InkwellError {
    InkwellError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> InkwellError {
    InkwellError::InternalError(message.to_string())
}
