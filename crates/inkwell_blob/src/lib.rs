// --- File: crates/inkwell_blob/src/lib.rs ---

pub mod error;
pub mod store;
#[cfg(test)]
mod store_test;

pub use error::BlobError;
pub use store::FsBlobStore;
