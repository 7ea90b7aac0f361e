// --- File: crates/inkwell_booking/src/lib.rs ---
//! Booking core: slot validation, conflict checking, and the reservation
//! and confirmation workflows, plus the HTTP surface that drives them.

pub mod conflict;
pub mod confirm;
pub mod error;
#[cfg(test)]
mod fakes;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod reserve;
#[cfg(test)]
mod reserve_test;
pub mod routes;
pub mod slot;

pub use confirm::{confirm, ConfirmOutcome};
pub use error::BookingError;
pub use handlers::BookingState;
pub use reserve::{reserve, ReservationOutcome, ReservationRequest, UploadedFile};
pub use routes::routes;
pub use slot::{validate_slot, SlotRejection};
