// --- File: crates/inkwell_notify/src/lib.rs ---

pub mod error;
pub mod ics;
pub mod service;

pub use error::NotifyError;
pub use service::SmtpNotifier;
