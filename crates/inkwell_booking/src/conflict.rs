// --- File: crates/inkwell_booking/src/conflict.rs ---
//! Conflict checking against confirmed bookings.
//!
//! Only confirmed rows block a slot. A tentative row is an in-flight,
//! possibly abandoned payment attempt; blocking on it would let an
//! abandoned checkout squat a slot indefinitely.

use chrono::{DateTime, Utc};
use inkwell_db::{Booking, BookingRepository, DbError};

/// Find a confirmed booking overlapping `[start, end)`.
///
/// Half-open overlap test: `stored.start < end AND stored.end > start`.
pub async fn find_conflict<R: BookingRepository>(
    repo: &R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Option<Booking>, DbError> {
    repo.find_confirmed_overlapping(start, end).await
}
