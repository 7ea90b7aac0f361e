//! Booking store for Inkwell
//!
//! This crate provides a database client that is designed to be database
//! agnostic, using SQLx as the underlying database library, plus the
//! booking repository built on top of it. It supports SQLite, PostgreSQL,
//! and MySQL through feature flags (SQLite is the default).

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{
    fmt_utc, parse_utc, Booking, BookingRepository, BookingStatus, ClientInfo, ConfirmUpdate,
    SqlBookingRepository, TentativeInsert,
};
