// --- File: crates/inkwell_stripe/src/service.rs ---
use crate::error::StripeError;
use crate::logic::{create_checkout_session, get_checkout_session_details, DepositSessionRequest};
use inkwell_common::services::{
    BoxFuture, CreateSessionRequest, PaymentProvider, PaymentSession, PaymentStatus,
};
use inkwell_config::AppConfig;
use std::sync::Arc;

/// Stripe Checkout implementation of the payment provider
pub struct StripeCheckoutProvider {
    config: Arc<AppConfig>,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl PaymentProvider for StripeCheckoutProvider {
    type Error = StripeError;

    fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> BoxFuture<'_, PaymentSession, Self::Error> {
        Box::pin(async move {
            let stripe_config = self.config.stripe.as_ref().ok_or(StripeError::ConfigError)?;

            // The deposit amount and currency come from configuration; the
            // request carries them so fakes can assert on the values, and
            // the configured checkout is authoritative.
            let response = create_checkout_session(
                stripe_config,
                DepositSessionRequest {
                    booking_id: request.booking_id,
                    product_name: request.product_name,
                    customer_email: request.customer_email,
                },
            )
            .await?;

            Ok(PaymentSession {
                session_ref: response.session_id,
                redirect_url: response.url,
            })
        })
    }

    fn payment_status(&self, session_ref: &str) -> BoxFuture<'_, PaymentStatus, Self::Error> {
        let session_ref = session_ref.to_string();
        Box::pin(async move {
            let session = get_checkout_session_details(&session_ref).await?;
            // Only an explicit "paid" answer counts; anything else is Unpaid.
            if session.payment_status.as_deref() == Some("paid") {
                Ok(PaymentStatus::Paid)
            } else {
                Ok(PaymentStatus::Unpaid)
            }
        })
    }
}
