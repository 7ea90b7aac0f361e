//! Error types for the booking store

use thiserror::Error;

/// Errors that can occur when working with the booking store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A stored row failed to decode into a booking
    #[error("Corrupt booking row: {0}")]
    CorruptRow(String),
}

impl From<DbError> for inkwell_common::InkwellError {
    fn from(err: DbError) -> Self {
        inkwell_common::InkwellError::DatabaseError(err.to_string())
    }
}
