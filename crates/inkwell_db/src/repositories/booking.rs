//! Repository for bookings
//!
//! The booking row is the only durable state in the system. Timestamps are
//! stored as RFC 3339 UTC text with a fixed seconds precision so string
//! ordering in SQL matches chronological ordering.

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Contact details captured at reservation time. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub age: i64,
    pub phone: String,
    pub email: String,
}

/// Lifecycle state of a booking.
///
/// `Tentative` rows never block other reservations; only `Confirmed` rows
/// participate in conflict checks. The only transition is
/// Tentative -> Confirmed, performed exactly once after verified payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Tentative,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Tentative => "tentative",
            BookingStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tentative" => Some(BookingStatus::Tentative),
            "confirmed" => Some(BookingStatus::Confirmed),
            _ => None,
        }
    }
}

/// The sole persistent entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// UUID v4, generated at creation, primary key.
    pub id: String,
    pub client: ClientInfo,
    /// Free-text tattoo request.
    pub description: String,
    /// Ordered blob references for uploaded reference files.
    pub attached_files: Vec<String>,
    /// Interval normalized to UTC. Invariant: `end > start`.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    /// Payment collaborator session reference, unique per booking.
    pub payment_session_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Canonical storage format for timestamps: `2026-08-31T13:00:00Z`.
pub fn fmt_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp previously written with [`fmt_utc`].
pub fn parse_utc(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::CorruptRow(format!("bad timestamp '{}': {}", s, e)))
}

/// Result of a tentative insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TentativeInsert {
    /// Row persisted with status = tentative.
    Inserted,
    /// A confirmed booking overlapped the interval inside the insert
    /// transaction; nothing was written.
    SlotTaken { taken_by: String },
}

/// Result of the conditional confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmUpdate {
    /// The row moved tentative -> confirmed.
    Updated,
    /// The row was not tentative any more (already confirmed by a
    /// concurrent invocation); nothing was written.
    NotTentative,
    /// A different confirmed booking overlapped the interval inside the
    /// confirm transaction; nothing was written.
    Overlap { winner_id: String },
}

/// Repository for bookings
///
/// Insert, point lookups, the confirmed-overlap range query, and the
/// status compare-and-swap. No deletes exist in this scope.
pub trait BookingRepository {
    /// Create the bookings table if it doesn't already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert a tentative booking.
    ///
    /// The overlap check against confirmed rows and the insert run inside
    /// one transaction, so a reservation that races a confirmation fails
    /// with `SlotTaken` instead of landing on an occupied slot.
    fn insert_tentative(
        &self,
        booking: &Booking,
    ) -> impl std::future::Future<Output = Result<TentativeInsert, DbError>> + Send;

    /// Point lookup by booking id.
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;

    /// Point lookup by payment session reference.
    fn find_by_payment_session(
        &self,
        session_ref: &str,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;

    /// Any confirmed booking whose interval overlaps `[start, end)`.
    /// Half-open overlap test: `stored.start < end AND stored.end > start`.
    fn find_confirmed_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;

    /// Flip a booking to confirmed unless another confirmed booking
    /// overlaps its interval.
    ///
    /// The self-excluded overlap check and the compare-and-swap on
    /// `status = tentative` run inside one transaction, the same
    /// read-check-write shape as `insert_tentative`. Two overlapping paid
    /// bookings confirming concurrently therefore cannot both pass the
    /// check: one gets `Updated`, the other `Overlap`.
    fn confirm_if_no_overlap(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<ConfirmUpdate, DbError>> + Send;

    /// All bookings starting at or after `from`, ordered by start time.
    fn list_from(
        &self,
        from: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_round_trips() {
        let dt = Utc.with_ymd_and_hms(2026, 9, 1, 17, 30, 0).unwrap();
        let s = fmt_utc(dt);
        assert_eq!(s, "2026-09-01T17:30:00Z");
        assert_eq!(parse_utc(&s).unwrap(), dt);
    }

    #[test]
    fn timestamp_format_orders_lexicographically() {
        let earlier = Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        assert!(fmt_utc(earlier) < fmt_utc(later));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [BookingStatus::Tentative, BookingStatus::Confirmed] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("paid"), None);
    }
}
