//! Repositories for the booking store

pub mod booking;
pub mod booking_sql;

pub use booking::{
    fmt_utc, parse_utc, Booking, BookingRepository, BookingStatus, ClientInfo, ConfirmUpdate,
    TentativeInsert,
};
pub use booking_sql::SqlBookingRepository;
