// --- File: crates/inkwell_booking/src/handlers.rs ---
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::confirm::{confirm, ConfirmOutcome};
use crate::error::BookingError;
use crate::reserve::{reserve, ReservationRequest, UploadedFile};
use inkwell_common::services::ServiceFactory;
use inkwell_common::HttpStatusCode;
use inkwell_config::AppConfig;
use inkwell_db::BookingRepository;
use inkwell_stripe::logic::{checkout_session_from_event, verify_stripe_signature, StripeEvent};

/// Shared state for the booking handlers, generic over the repository so
/// tests can drive the handlers with an in-memory store.
pub struct BookingState<R> {
    pub config: Arc<AppConfig>,
    pub repo: Arc<R>,
    pub services: Arc<dyn ServiceFactory>,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    /// Hosted checkout URL the client is sent to for the deposit.
    pub redirect_url: String,
}

#[derive(Serialize)]
pub struct BookingSummary {
    pub id: String,
    pub client_name: String,
    pub start: String,
    pub end: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CheckoutReturnQuery {
    pub session_id: String,
}

fn error_response(err: &BookingError) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string())
}

/// POST /bookings
///
/// Multipart form submission: text fields `name`, `age`, `phone`, `email`,
/// `description`, `date` (YYYY-MM-DD), `start_time` / `end_time` (HH:MM),
/// plus any number of `files` parts with reference images.
pub async fn create_booking_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
    mut multipart: Multipart,
) -> Result<Json<CreateBookingResponse>, (StatusCode, String)>
where
    R: BookingRepository + Send + Sync + 'static,
{
    let mut name = String::new();
    let mut age: Option<i64> = None;
    let mut phone = String::new();
    let mut email = String::new();
    let mut description = String::new();
    let mut date: Option<NaiveDate> = None;
    let mut start_time: Option<NaiveTime> = None;
    let mut end_time: Option<NaiveTime> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Malformed form: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "files" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("File read error: {}", e))
                })?;
                files.push(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                let value = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Field read error: {}", e))
                })?;
                match other {
                    "name" => name = value,
                    "age" => {
                        age = Some(value.trim().parse().map_err(|_| {
                            (StatusCode::BAD_REQUEST, "Invalid age".to_string())
                        })?)
                    }
                    "phone" => phone = value,
                    "email" => email = value,
                    "description" => description = value,
                    "date" => {
                        date = Some(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(
                            |_| (StatusCode::BAD_REQUEST, "Invalid date".to_string()),
                        )?)
                    }
                    "start_time" => {
                        start_time =
                            Some(NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(
                                |_| (StatusCode::BAD_REQUEST, "Invalid start time".to_string()),
                            )?)
                    }
                    "end_time" => {
                        end_time = Some(NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(
                            |_| (StatusCode::BAD_REQUEST, "Invalid end time".to_string()),
                        )?)
                    }
                    _ => {} // Unknown fields are ignored
                }
            }
        }
    }

    let age = age.ok_or((StatusCode::BAD_REQUEST, "Missing age".to_string()))?;
    let date = date.ok_or((StatusCode::BAD_REQUEST, "Missing date".to_string()))?;
    let start_time =
        start_time.ok_or((StatusCode::BAD_REQUEST, "Missing start time".to_string()))?;
    let end_time = end_time.ok_or((StatusCode::BAD_REQUEST, "Missing end time".to_string()))?;

    let payment = state.services.payment_provider().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Payments are not enabled".to_string(),
    ))?;
    let blob_store = state.services.blob_store();

    let tz: Tz = state.config.studio.timezone.parse().map_err(|_| {
        error!(timezone = %state.config.studio.timezone, "invalid studio timezone");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Studio misconfigured".to_string(),
        )
    })?;
    let today = Utc::now().with_timezone(&tz).date_naive();

    let request = ReservationRequest {
        name,
        age,
        phone,
        email,
        description,
        files,
        date,
        start_time,
        end_time,
    };

    match reserve(
        &state.config,
        state.repo.as_ref(),
        &payment,
        blob_store.as_ref(),
        today,
        request,
    )
    .await
    {
        Ok(outcome) => Ok(Json(CreateBookingResponse {
            booking_id: outcome.booking_id,
            redirect_url: outcome.redirect_url,
        })),
        Err(e) => Err(error_response(&e)),
    }
}

/// POST /stripe/webhook
///
/// Signature is verified against `STRIPE_WEBHOOK_SECRET` before the body
/// is parsed. Only `checkout.session.completed` events are acted on;
/// everything else is acknowledged and dropped. A `NotPaid` outcome is
/// answered with 503 so the event gets redelivered once the provider's
/// payment state has settled.
pub async fn stripe_webhook_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
    headers: HeaderMap,
    body: String,
) -> Response
where
    R: BookingRepository + Send + Sync + 'static,
{
    if !state.config.use_stripe {
        return (StatusCode::SERVICE_UNAVAILABLE, "Stripe service disabled.").into_response();
    }

    let webhook_secret = match std::env::var("STRIPE_WEBHOOK_SECRET") {
        Ok(s) => s,
        Err(_) => {
            error!("STRIPE_WEBHOOK_SECRET environment variable not set");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let sig_header = headers.get("Stripe-Signature").and_then(|h| h.to_str().ok());
    if let Err(e) = verify_stripe_signature(body.as_bytes(), sig_header, &webhook_secret) {
        warn!(error = %e, "webhook signature verification failed");
        return (StatusCode::BAD_REQUEST, format!("Invalid signature: {}", e)).into_response();
    }

    let event: StripeEvent = match serde_json::from_str(&body) {
        Ok(ev) => ev,
        Err(e) => {
            warn!(error = %e, "failed to deserialize webhook event");
            return (StatusCode::BAD_REQUEST, "Invalid payload format".to_string()).into_response();
        }
    };

    let session = match checkout_session_from_event(&event) {
        Ok(Some(session)) => session,
        Ok(None) => {
            info!(event_type = %event.event_type, "ignoring webhook event");
            return StatusCode::OK.into_response();
        }
        Err(e) => {
            warn!(error = %e, "failed to parse checkout session from event");
            return (StatusCode::BAD_REQUEST, "Invalid event payload".to_string()).into_response();
        }
    };

    let result = run_confirmation(&state, &session.id).await;
    match &result {
        Ok(ConfirmOutcome::NotPaid) => {
            warn!(session_id = %session.id, "completed event for a session not yet reported paid");
        }
        Ok(outcome) => {
            info!(session_id = %session.id, ?outcome, "webhook confirmation handled");
        }
        Err(BookingError::ConflictAtConfirmation { booking_id }) => {
            error!(booking_id = %booking_id, "paid booking conflicts; manual resolution required");
        }
        Err(e) => {
            error!(error = %e, session_id = %session.id, "webhook confirmation failed");
        }
    }
    webhook_reply(result)
}

/// Map a confirmation result onto the webhook acknowledgement status.
///
/// `NotPaid` answers 503 so the provider redelivers the event once its
/// payment state catches up with the completed checkout. A conflict is
/// acknowledged with 200: a retry can never succeed and the operator
/// resolves the refund out of band.
pub(crate) fn webhook_reply(result: Result<ConfirmOutcome, BookingError>) -> Response {
    match result {
        Ok(ConfirmOutcome::NotPaid) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Ok(_) => StatusCode::OK.into_response(),
        Err(BookingError::ConflictAtConfirmation { .. }) => StatusCode::OK.into_response(),
        Err(e) => {
            let (status, message) = error_response(&e);
            (status, message).into_response()
        }
    }
}

/// GET /stripe/checkout-success?session_id=...
///
/// Client return URL after hosted checkout. Runs the same confirmation
/// workflow as the webhook; whichever lands first wins, the other sees
/// the idempotent outcome.
pub async fn checkout_success_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
    Query(query): Query<CheckoutReturnQuery>,
) -> Response
where
    R: BookingRepository + Send + Sync + 'static,
{
    match run_confirmation(&state, &query.session_id).await {
        Ok(ConfirmOutcome::Confirmed { .. }) | Ok(ConfirmOutcome::AlreadyConfirmed) => Html(
            "<h1>Booking confirmed</h1>\
             <p>Your deposit has been received and your appointment is locked in. \
             A confirmation email is on its way to the studio.</p>"
                .to_string(),
        )
        .into_response(),
        Ok(ConfirmOutcome::NotPaid) => Html(
            "<h1>Payment pending</h1>\
             <p>Your payment has not completed yet. If you finished checkout, \
             refresh this page in a moment.</p>"
                .to_string(),
        )
        .into_response(),
        Ok(ConfirmOutcome::NotFound) => (
            StatusCode::NOT_FOUND,
            Html("<h1>Booking not found</h1>".to_string()),
        )
            .into_response(),
        Err(BookingError::ConflictAtConfirmation { .. }) => (
            StatusCode::CONFLICT,
            Html(
                "<h1>Payment received, slot no longer available</h1>\
                 <p>Another booking was confirmed for this slot first. \
                 Please contact the studio for a refund or to reschedule.</p>"
                    .to_string(),
            ),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, session_id = %query.session_id, "checkout return failed");
            let (status, message) = error_response(&e);
            (status, message).into_response()
        }
    }
}

/// GET /stripe/checkout-cancel
pub async fn checkout_cancel_handler() -> Html<String> {
    Html(
        "<h1>Checkout cancelled</h1>\
         <p>No payment was taken and no slot was held. You can submit a new \
         booking request any time.</p>"
            .to_string(),
    )
}

/// GET /bookings/upcoming
///
/// Read-only list of bookings starting from now, for the studio's admin
/// view.
pub async fn upcoming_bookings_handler<R>(
    State(state): State<Arc<BookingState<R>>>,
) -> Result<Json<Vec<BookingSummary>>, (StatusCode, String)>
where
    R: BookingRepository + Send + Sync + 'static,
{
    let bookings = state
        .repo
        .list_from(Utc::now())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(
        bookings
            .into_iter()
            .map(|b| BookingSummary {
                id: b.id,
                client_name: b.client.name,
                start: inkwell_db::fmt_utc(b.start),
                end: inkwell_db::fmt_utc(b.end),
                status: b.status.as_str().to_string(),
            })
            .collect(),
    ))
}

async fn run_confirmation<R>(
    state: &Arc<BookingState<R>>,
    session_ref: &str,
) -> Result<ConfirmOutcome, BookingError>
where
    R: BookingRepository + Send + Sync + 'static,
{
    let payment = state
        .services
        .payment_provider()
        .ok_or_else(|| BookingError::Internal("Payments are not enabled".to_string()))?;
    let notifier = state.services.notifier();
    confirm(
        state.repo.as_ref(),
        &payment,
        notifier.as_ref(),
        session_ref,
    )
    .await
}
