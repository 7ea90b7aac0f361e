// --- File: crates/inkwell_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The booking workflows depend only on these traits; concrete adapters
//! (Stripe checkout, SMTP mailer, filesystem blob store) live in their own
//! crates. This keeps the core logic testable with in-process fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for hosted payment-collection sessions.
///
/// The reservation workflow asks the provider for a checkout session and a
/// redirect target; the confirmation workflow asks it whether the session
/// has actually been paid. No refunds or subscriptions belong here.
pub trait PaymentProvider: Send + Sync {
    /// Error type returned by payment provider operations.
    type Error: StdError + Send + Sync + 'static;

    /// Create a hosted payment session for a fixed amount.
    fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> BoxFuture<'_, PaymentSession, Self::Error>;

    /// Query the authoritative paid/unpaid state of a session.
    fn payment_status(&self, session_ref: &str) -> BoxFuture<'_, PaymentStatus, Self::Error>;
}

/// A trait for notifying the studio owner about a confirmed booking.
///
/// Fire-and-forget: callers log failures and never roll anything back.
pub trait Notifier: Send + Sync {
    /// Error type returned by notification operations.
    type Error: StdError + Send + Sync + 'static;

    /// Send a confirmation notice (email with a calendar invite attached).
    fn notify_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A trait for durable storage of uploaded reference files.
pub trait BlobStore: Send + Sync {
    /// Error type returned by blob store operations.
    type Error: StdError + Send + Sync + 'static;

    /// Persist `bytes` under the booking's namespace and return a stable
    /// opaque reference for later retrieval.
    fn store(
        &self,
        booking_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, String, Self::Error>;
}

/// A factory for creating service instances.
///
/// Adapters are conditionally constructed from configuration; a `None`
/// means the corresponding runtime flag is off.
pub trait ServiceFactory: Send + Sync {
    /// Get a payment provider instance.
    fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>>;

    /// Get a notifier instance.
    fn notifier(&self) -> Option<Arc<dyn Notifier<Error = BoxedError>>>;

    /// Get a blob store instance.
    fn blob_store(&self) -> Option<Arc<dyn BlobStore<Error = BoxedError>>>;
}

/// Request to create a hosted payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Amount in the smallest currency unit (cents).
    pub amount_cents: i64,
    /// Lowercase ISO currency code, e.g. "usd".
    pub currency: String,
    /// Line-item label shown on the hosted checkout page.
    pub product_name: String,
    /// Pre-generated booking id, carried in the session metadata.
    pub booking_id: String,
    /// Customer email forwarded to the checkout page, if known.
    pub customer_email: Option<String>,
}

/// A created payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Opaque provider-side session reference.
    pub session_ref: String,
    /// URL the client is redirected to in order to pay.
    pub redirect_url: String,
}

/// Authoritative payment state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// Everything the notifier needs to describe a confirmed appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotice {
    pub booking_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the notification.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}
