// --- File: crates/inkwell_stripe/src/lib.rs ---
// Declare modules within this crate
pub mod error;
pub mod logic;
pub mod service;

pub use error::StripeError;
pub use logic::{
    checkout_session_from_event, create_checkout_session, get_checkout_session_details,
    verify_stripe_signature, DepositSessionRequest, StripeCheckoutSessionObject, StripeEvent,
};
pub use service::StripeCheckoutProvider;
