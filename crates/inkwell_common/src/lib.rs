// --- File: crates/inkwell_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, not_found, validation_error,
    HttpStatusCode, InkwellError,
};

// Re-export HTTP utilities for easier access
pub use http::{create_client, HTTP_CLIENT};

// Re-export the service abstractions used across crates
pub use services::{
    BlobStore, BookingNotice, BoxFuture, BoxedError, CreateSessionRequest, NotificationResult,
    Notifier, PaymentProvider, PaymentSession, PaymentStatus, ServiceFactory,
};
