// --- File: crates/inkwell_notify/src/error.rs ---
use inkwell_common::error::InkwellError;
use inkwell_common::HttpStatusCode;
use thiserror::Error;

/// Errors that can occur during notification operations.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Notification configuration is missing or incomplete.
    #[error("Notification configuration missing or incomplete")]
    ConfigError,

    /// An email address could not be parsed.
    #[error("Invalid email address: {0}")]
    AddressError(String),

    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    BuildError(String),

    /// The SMTP transport rejected the message.
    #[error("Failed to send email: {0}")]
    SendError(String),

    /// Internal error.
    #[error("Internal notification error: {0}")]
    InternalError(String),
}

impl From<NotifyError> for InkwellError {
    fn from(error: NotifyError) -> Self {
        match error {
            NotifyError::ConfigError => {
                InkwellError::ConfigError("Notification configuration missing".to_string())
            }
            NotifyError::AddressError(msg) => {
                InkwellError::ValidationError(format!("Invalid email address: {}", msg))
            }
            NotifyError::BuildError(msg) => {
                InkwellError::InternalError(format!("Failed to build email: {}", msg))
            }
            NotifyError::SendError(msg) => InkwellError::ExternalServiceError {
                service_name: "SMTP".to_string(),
                message: msg,
            },
            NotifyError::InternalError(msg) => InkwellError::InternalError(msg),
        }
    }
}

impl HttpStatusCode for NotifyError {
    fn status_code(&self) -> u16 {
        match self {
            NotifyError::ConfigError => 500,
            NotifyError::AddressError(_) => 400,
            NotifyError::BuildError(_) => 500,
            NotifyError::SendError(_) => 502,
            NotifyError::InternalError(_) => 500,
        }
    }
}
