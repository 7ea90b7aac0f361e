// --- File: crates/inkwell_booking/src/confirm.rs ---
//! Confirmation workflow: verify payment, close the conflict race, flip
//! the booking to confirmed, notify the studio.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::BookingError;
use inkwell_common::services::{BookingNotice, BoxedError, Notifier, PaymentProvider, PaymentStatus};
use inkwell_db::{BookingRepository, BookingStatus, ConfirmUpdate};

/// Outcome of a confirmation attempt. Everything here is a normal,
/// idempotent result; abnormal cases are `BookingError`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The booking moved to confirmed on this invocation.
    Confirmed { booking_id: String },
    /// The booking was already confirmed (webhook retry, or the client
    /// return URL after the webhook landed).
    AlreadyConfirmed,
    /// The payment provider does not report the session as paid.
    NotPaid,
    /// No booking carries this payment session reference.
    NotFound,
}

/// Confirm the booking tied to a payment session reference.
///
/// Safe under concurrent invocation: the overlap re-check and the status
/// flip run inside one repository transaction, so of two overlapping paid
/// bookings confirming at once exactly one lands and the other gets
/// `ConflictAtConfirmation`. For the same booking the flip is a
/// compare-and-swap on `status = tentative`; losers see `AlreadyConfirmed`.
/// A booking is never confirmed without a positive `Paid` answer from the
/// payment provider.
pub async fn confirm<R: BookingRepository>(
    repo: &R,
    payment: &Arc<dyn PaymentProvider<Error = BoxedError>>,
    notifier: Option<&Arc<dyn Notifier<Error = BoxedError>>>,
    session_ref: &str,
) -> Result<ConfirmOutcome, BookingError> {
    let booking = match repo.find_by_payment_session(session_ref).await? {
        Some(booking) => booking,
        None => return Ok(ConfirmOutcome::NotFound),
    };

    if booking.status == BookingStatus::Confirmed {
        return Ok(ConfirmOutcome::AlreadyConfirmed);
    }

    let status = payment.payment_status(session_ref).await.map_err(|e| {
        warn!(booking_id = %booking.id, error = %e, "payment status query failed");
        BookingError::External {
            service: "payment provider",
            message: e.to_string(),
        }
    })?;
    if status != PaymentStatus::Paid {
        return Ok(ConfirmOutcome::NotPaid);
    }

    // Another overlapping booking may have confirmed while this one was
    // paying. The repository re-checks inside the same transaction as the
    // status flip; refusing here is the hard consistency gate and the
    // operator resolves it with a refund.
    match repo
        .confirm_if_no_overlap(&booking.id, booking.start, booking.end)
        .await?
    {
        ConfirmUpdate::Updated => {}
        // Lost the CAS race to a concurrent invocation for the same row.
        ConfirmUpdate::NotTentative => return Ok(ConfirmOutcome::AlreadyConfirmed),
        ConfirmUpdate::Overlap { winner_id } => {
            warn!(booking_id = %booking.id, conflicting_id = %winner_id,
                "paid booking lost the slot to an earlier confirmation");
            return Err(BookingError::ConflictAtConfirmation {
                booking_id: booking.id,
            });
        }
    }
    info!(booking_id = %booking.id, "booking confirmed");

    if let Some(notifier) = notifier {
        let notice = BookingNotice {
            booking_id: booking.id.clone(),
            client_name: booking.client.name.clone(),
            client_email: booking.client.email.clone(),
            client_phone: booking.client.phone.clone(),
            description: booking.description.clone(),
            start: booking.start,
            end: booking.end,
        };
        // Best-effort: the confirmation stands even if the email fails.
        if let Err(e) = notifier.notify_confirmed(notice).await {
            warn!(booking_id = %booking.id, error = %e, "confirmation notification failed");
        }
    }

    Ok(ConfirmOutcome::Confirmed {
        booking_id: booking.id,
    })
}
