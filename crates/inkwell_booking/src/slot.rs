// --- File: crates/inkwell_booking/src/slot.rs ---
//! Slot validation against the studio's business-hours rules.
//!
//! Pure functions over a [`StudioConfig`] snapshot: no clock reads, no I/O.
//! Callers supply `today` so the lead/horizon window is deterministic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use inkwell_config::StudioConfig;
use thiserror::Error;

/// Reasons a proposed slot is rejected. Checked in declaration order; the
/// first failing rule wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRejection {
    #[error("The studio is closed on that day")]
    ClosedDay,

    #[error("Requested time falls outside business hours")]
    OutsideBusinessHours,

    #[error("End time must be after start time")]
    InvertedInterval,

    #[error("Appointment is shorter than the minimum duration")]
    TooShort,

    #[error("Date is outside the bookable window")]
    OutOfWindow,
}

/// Validate a proposed `(date, start, end)` slot against studio rules.
///
/// Rules, short-circuiting on the first failure:
/// 1. the weekday is not the configured closed day;
/// 2. both times lie within the open-hour window (start inclusive, end may
///    land exactly on the closing boundary);
/// 3. the interval is not inverted;
/// 4. the interval meets the minimum duration;
/// 5. the date lies within `[today + lead, today + horizon]`.
pub fn validate_slot(
    studio: &StudioConfig,
    today: NaiveDate,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<(), SlotRejection> {
    if date.weekday().num_days_from_monday() == u32::from(studio.closed_weekday) {
        return Err(SlotRejection::ClosedDay);
    }

    let open = hour_time(studio.open_hour).ok_or(SlotRejection::OutsideBusinessHours)?;
    let close = hour_time(studio.close_hour).ok_or(SlotRejection::OutsideBusinessHours)?;
    if start < open || start > close || end < open || end > close {
        return Err(SlotRejection::OutsideBusinessHours);
    }

    if end <= start {
        return Err(SlotRejection::InvertedInterval);
    }

    let duration_minutes = (end - start).num_minutes();
    if duration_minutes < studio.effective_min_duration_minutes() {
        return Err(SlotRejection::TooShort);
    }

    let earliest = today + Duration::days(studio.booking_lead_days);
    let latest = today + Duration::days(studio.booking_horizon_days);
    if date < earliest || date > latest {
        return Err(SlotRejection::OutOfWindow);
    }

    Ok(())
}

fn hour_time(hour: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0)
}

/// Resolve a studio-local wall-clock instant to UTC.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// nonexistent local times (DST spring-forward gap) yield `None`. Studio
/// hours of 12:00-20:00 never touch the gap, so `None` only appears with
/// unusual configurations.
pub fn local_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
