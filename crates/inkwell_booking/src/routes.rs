// --- File: crates/inkwell_booking/src/routes.rs ---
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers::{
    checkout_cancel_handler, checkout_success_handler, create_booking_handler,
    stripe_webhook_handler, upcoming_bookings_handler, BookingState,
};
use inkwell_db::BookingRepository;

/// All booking routes, mounted under `/api` by the backend.
pub fn routes<R>(state: Arc<BookingState<R>>) -> Router
where
    R: BookingRepository + Send + Sync + 'static,
{
    // Multipart bodies carry reference images; allow a handful of files
    // at the per-file cap.
    let body_limit = DefaultBodyLimit::max(32 * 1024 * 1024);

    Router::new()
        .route("/bookings", post(create_booking_handler))
        .route("/bookings/upcoming", get(upcoming_bookings_handler))
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .route("/stripe/checkout-success", get(checkout_success_handler))
        .route("/stripe/checkout-cancel", get(checkout_cancel_handler))
        .layer(body_limit)
        .with_state(state)
}
