// --- File: crates/services/inkwell_backend/src/service_factory.rs ---
//! Wires concrete adapters behind the capability traits.
//!
//! Each adapter keeps its own typed error; the wrappers here box those
//! errors so the workflows can hold the adapters as trait objects with a
//! single error type.

use std::sync::Arc;

use tracing::info;

use inkwell_blob::FsBlobStore;
use inkwell_common::services::{
    BlobStore, BookingNotice, BoxFuture, BoxedError, CreateSessionRequest, NotificationResult,
    Notifier, PaymentProvider, PaymentSession, PaymentStatus, ServiceFactory,
};
use inkwell_config::AppConfig;
use inkwell_notify::SmtpNotifier;
use inkwell_stripe::service::StripeCheckoutProvider;

struct BoxedPaymentProvider {
    inner: StripeCheckoutProvider,
}

impl PaymentProvider for BoxedPaymentProvider {
    type Error = BoxedError;

    fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> BoxFuture<'_, PaymentSession, Self::Error> {
        Box::pin(async move {
            self.inner
                .create_session(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn payment_status(&self, session_ref: &str) -> BoxFuture<'_, PaymentStatus, Self::Error> {
        let session_ref = session_ref.to_string();
        Box::pin(async move {
            self.inner
                .payment_status(&session_ref)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

struct BoxedNotifier {
    inner: SmtpNotifier,
}

impl Notifier for BoxedNotifier {
    type Error = BoxedError;

    fn notify_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .notify_confirmed(notice)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

struct BoxedBlobStore {
    inner: FsBlobStore,
}

impl BlobStore for BoxedBlobStore {
    type Error = BoxedError;

    fn store(
        &self,
        booking_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, String, Self::Error> {
        let booking_id = booking_id.to_string();
        let filename = filename.to_string();
        Box::pin(async move {
            self.inner
                .store(&booking_id, &filename, bytes)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the booking backend.
///
/// Adapters are built once at startup from configuration; the runtime
/// flags decide which ones exist.
pub struct InkwellServiceFactory {
    payment_provider: Option<Arc<dyn PaymentProvider<Error = BoxedError>>>,
    notifier: Option<Arc<dyn Notifier<Error = BoxedError>>>,
    blob_store: Option<Arc<dyn BlobStore<Error = BoxedError>>>,
}

impl InkwellServiceFactory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let payment_provider: Option<Arc<dyn PaymentProvider<Error = BoxedError>>> =
            if config.use_stripe && config.stripe.is_some() {
                info!("Initializing Stripe payment provider");
                Some(Arc::new(BoxedPaymentProvider {
                    inner: StripeCheckoutProvider::new(config.clone()),
                }))
            } else {
                None
            };

        let notifier: Option<Arc<dyn Notifier<Error = BoxedError>>> =
            if config.use_notifications && config.notification.is_some() {
                info!("Initializing SMTP notifier");
                Some(Arc::new(BoxedNotifier {
                    inner: SmtpNotifier::new(config.clone()),
                }))
            } else {
                None
            };

        let blob_store: Option<Arc<dyn BlobStore<Error = BoxedError>>> =
            Some(Arc::new(BoxedBlobStore {
                inner: FsBlobStore::new(config),
            }));

        Self {
            payment_provider,
            notifier,
            blob_store,
        }
    }
}

impl ServiceFactory for InkwellServiceFactory {
    fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>> {
        self.payment_provider.clone()
    }

    fn notifier(&self) -> Option<Arc<dyn Notifier<Error = BoxedError>>> {
        self.notifier.clone()
    }

    fn blob_store(&self) -> Option<Arc<dyn BlobStore<Error = BoxedError>>> {
        self.blob_store.clone()
    }
}
