// --- File: crates/inkwell_booking/src/error.rs ---
use crate::slot::SlotRejection;
use inkwell_common::error::InkwellError;
use inkwell_common::HttpStatusCode;
use inkwell_db::DbError;
use thiserror::Error;

/// Errors surfaced by the reservation and confirmation workflows.
#[derive(Error, Debug)]
pub enum BookingError {
    /// A required form field was empty after trimming.
    #[error("Missing required field: {0}")]
    IncompleteForm(&'static str),

    /// Clients must be at least 18.
    #[error("Clients must be 18 or older")]
    Underage,

    /// The slot validator rejected the proposed interval.
    #[error("{0}")]
    SlotRejected(#[from] SlotRejection),

    /// A confirmed booking already occupies the slot.
    #[error("Slot already booked by {taken_by}")]
    SlotTaken { taken_by: String },

    /// Payment succeeded but an overlapping booking was confirmed first.
    /// Requires operator intervention (refund path).
    #[error("Payment received but the slot is no longer available; please contact the studio")]
    ConflictAtConfirmation { booking_id: String },

    /// The configured studio timezone is not a valid IANA name.
    #[error("Invalid studio timezone: {0}")]
    InvalidTimezone(String),

    /// The local wall-clock time does not exist in the studio timezone.
    #[error("Requested time is not representable in the studio timezone")]
    UnrepresentableTime,

    /// Booking store failure.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A collaborator (payment, blob store) failed. The caller gets a
    /// generic retry message; details go to the log.
    #[error("{service} is temporarily unavailable, please try again")]
    External { service: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BookingError> for InkwellError {
    fn from(error: BookingError) -> Self {
        match error {
            BookingError::IncompleteForm(field) => {
                InkwellError::ValidationError(format!("Missing required field: {}", field))
            }
            BookingError::Underage => {
                InkwellError::ValidationError("Clients must be 18 or older".to_string())
            }
            BookingError::SlotRejected(rejection) => {
                InkwellError::ValidationError(rejection.to_string())
            }
            BookingError::SlotTaken { taken_by } => {
                InkwellError::ConflictError(format!("Slot already booked by {}", taken_by))
            }
            BookingError::ConflictAtConfirmation { booking_id } => InkwellError::ConflictError(
                format!("Booking {} paid but slot no longer available", booking_id),
            ),
            BookingError::InvalidTimezone(tz) => {
                InkwellError::ConfigError(format!("Invalid studio timezone: {}", tz))
            }
            BookingError::UnrepresentableTime => InkwellError::ValidationError(
                "Requested time is not representable in the studio timezone".to_string(),
            ),
            BookingError::Database(e) => e.into(),
            BookingError::External { service, message } => InkwellError::ExternalServiceError {
                service_name: service.to_string(),
                message,
            },
            BookingError::Internal(msg) => InkwellError::InternalError(msg),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::IncompleteForm(_) => 400,
            BookingError::Underage => 400,
            BookingError::SlotRejected(_) => 400,
            BookingError::SlotTaken { .. } => 409,
            BookingError::ConflictAtConfirmation { .. } => 409,
            BookingError::InvalidTimezone(_) => 500,
            BookingError::UnrepresentableTime => 400,
            BookingError::Database(_) => 500,
            BookingError::External { .. } => 502,
            BookingError::Internal(_) => 500,
        }
    }
}
