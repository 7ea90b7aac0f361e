// --- File: crates/inkwell_booking/src/reserve.rs ---
//! Reservation workflow: validate, conflict-check, store files, open a
//! payment session, persist the tentative booking.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};
use uuid::Uuid;

use crate::conflict::find_conflict;
use crate::error::BookingError;
use crate::slot::{local_to_utc, validate_slot};
use inkwell_common::services::{BlobStore, BoxedError, CreateSessionRequest, PaymentProvider};
use inkwell_config::AppConfig;
use inkwell_db::{Booking, BookingRepository, BookingStatus, ClientInfo, TentativeInsert};

/// Fallback deposit when no payment section is configured (cents / code).
const DEFAULT_DEPOSIT_CENTS: i64 = 15_000;
const DEFAULT_CURRENCY: &str = "usd";

/// One uploaded reference file, already read into memory by the handler.
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Complete reservation input, gathered from the submitted form.
pub struct ReservationRequest {
    pub name: String,
    pub age: i64,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub files: Vec<UploadedFile>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// What the caller needs to resume the payment flow.
#[derive(Debug, Clone)]
pub struct ReservationOutcome {
    pub booking_id: String,
    pub redirect_url: String,
}

/// Reserve a slot: returns the tentative booking id and the payment
/// redirect URL.
///
/// `today` is the current date in the studio timezone; handlers read the
/// clock, this function stays deterministic. Collaborator failures are
/// logged with context and surface as a generic retry error. Nothing
/// half-created becomes bookable: the tentative row is the last write.
pub async fn reserve<R: BookingRepository>(
    config: &AppConfig,
    repo: &R,
    payment: &Arc<dyn PaymentProvider<Error = BoxedError>>,
    blob_store: Option<&Arc<dyn BlobStore<Error = BoxedError>>>,
    today: NaiveDate,
    request: ReservationRequest,
) -> Result<ReservationOutcome, BookingError> {
    let name = required(&request.name, "name")?;
    let phone = required(&request.phone, "phone")?;
    let email = required(&request.email, "email")?;
    let description = required(&request.description, "description")?;
    if request.age < 18 {
        return Err(BookingError::Underage);
    }

    validate_slot(
        &config.studio,
        today,
        request.date,
        request.start_time,
        request.end_time,
    )?;

    let tz: Tz = config
        .studio
        .timezone
        .parse()
        .map_err(|_| BookingError::InvalidTimezone(config.studio.timezone.clone()))?;
    let start = local_to_utc(tz, request.date, request.start_time)
        .ok_or(BookingError::UnrepresentableTime)?;
    let end = local_to_utc(tz, request.date, request.end_time)
        .ok_or(BookingError::UnrepresentableTime)?;

    if let Some(conflicting) = find_conflict(repo, start, end).await? {
        return Err(BookingError::SlotTaken {
            taken_by: conflicting.client.name,
        });
    }

    // Generate the id up front so files and payment metadata can carry it.
    let booking_id = Uuid::new_v4().to_string();

    let mut attached_files = Vec::with_capacity(request.files.len());
    if let Some(store) = blob_store {
        for file in request.files {
            let blob_ref = store
                .store(&booking_id, &file.filename, file.bytes)
                .await
                .map_err(|e| {
                    error!(booking_id = %booking_id, file = %file.filename, error = %e,
                        "reference file upload failed");
                    BookingError::External {
                        service: "file storage",
                        message: e.to_string(),
                    }
                })?;
            attached_files.push(blob_ref);
        }
    }

    let (amount_cents, currency) = match config.stripe.as_ref() {
        Some(stripe) => (stripe.deposit_amount_cents, stripe.currency.clone()),
        None => (DEFAULT_DEPOSIT_CENTS, DEFAULT_CURRENCY.to_string()),
    };
    let session = payment
        .create_session(CreateSessionRequest {
            amount_cents,
            currency,
            product_name: format!("Tattoo deposit for {}", name),
            booking_id: booking_id.clone(),
            customer_email: Some(email.clone()),
        })
        .await
        .map_err(|e| {
            error!(booking_id = %booking_id, error = %e, "payment session creation failed");
            BookingError::External {
                service: "payment provider",
                message: e.to_string(),
            }
        })?;

    let booking = Booking {
        id: booking_id.clone(),
        client: ClientInfo {
            name,
            age: request.age,
            phone,
            email,
        },
        description,
        attached_files,
        start,
        end,
        status: BookingStatus::Tentative,
        payment_session_ref: session.session_ref,
        created_at: Utc::now(),
    };

    // The repository re-checks the overlap inside one transaction with the
    // insert, so a reservation racing a confirmation fails here rather than
    // landing on an occupied slot.
    match repo.insert_tentative(&booking).await? {
        TentativeInsert::Inserted => {
            info!(booking_id = %booking_id, start = %booking.start, end = %booking.end,
                "tentative booking created");
            Ok(ReservationOutcome {
                booking_id,
                redirect_url: session.redirect_url,
            })
        }
        TentativeInsert::SlotTaken { taken_by } => Err(BookingError::SlotTaken { taken_by }),
    }
}

fn required(value: &str, field: &'static str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::IncompleteForm(field));
    }
    Ok(trimmed.to_string())
}
