// --- File: crates/inkwell_notify/src/ics.rs ---
//! Renders an iCalendar (RFC 5545) invite for a confirmed appointment.
//!
//! Kept deliberately small: one VCALENDAR with one VEVENT, rendered as a
//! string with CRLF line endings so mail clients attach it verbatim.

use chrono::{DateTime, Utc};

/// Everything needed to render a single calendar event.
#[derive(Debug, Clone)]
pub struct IcsEvent {
    /// Globally unique identifier for the event (booking id based).
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    /// Organizer email address (the studio).
    pub organizer_email: String,
    /// Attendee email address (the client).
    pub attendee_email: String,
}

/// Format a UTC instant in iCalendar basic format, e.g. `20260901T173000Z`.
pub fn ics_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape TEXT property values per RFC 5545 section 3.3.11.
///
/// Backslash first, then commas, semicolons and newlines.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Render a complete VCALENDAR document for a confirmed appointment.
pub fn render_confirmed_event(event: &IcsEvent, now: DateTime<Utc>) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Inkwell Tattoo Studio//Booking//EN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", escape_text(&event.uid)),
        format!("DTSTAMP:{}", ics_timestamp(now)),
        format!("DTSTART:{}", ics_timestamp(event.start)),
        format!("DTEND:{}", ics_timestamp(event.end)),
        format!("SUMMARY:{}", escape_text(&event.summary)),
        format!("DESCRIPTION:{}", escape_text(&event.description)),
        format!("ORGANIZER:mailto:{}", event.organizer_email),
        format!("ATTENDEE:mailto:{}", event.attendee_email),
        "STATUS:CONFIRMED".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}
