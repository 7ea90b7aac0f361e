// --- File: crates/inkwell_blob/src/error.rs ---
use inkwell_common::error::InkwellError;
use inkwell_common::HttpStatusCode;
use thiserror::Error;

/// Errors that can occur while storing uploaded reference files.
#[derive(Error, Debug)]
pub enum BlobError {
    /// The filename is empty or reduces to nothing after sanitization.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// The file extension is not on the allow-list.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The file exceeds the configured size cap.
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Filesystem error.
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<BlobError> for InkwellError {
    fn from(error: BlobError) -> Self {
        match error {
            BlobError::InvalidFilename(msg) => {
                InkwellError::ValidationError(format!("Invalid filename: {}", msg))
            }
            BlobError::UnsupportedType(ext) => {
                InkwellError::ValidationError(format!("Unsupported file type: {}", ext))
            }
            BlobError::TooLarge { size, limit } => InkwellError::ValidationError(format!(
                "File too large: {} bytes (limit {})",
                size, limit
            )),
            BlobError::IoError(e) => InkwellError::InternalError(format!("Storage error: {}", e)),
        }
    }
}

impl HttpStatusCode for BlobError {
    fn status_code(&self) -> u16 {
        match self {
            BlobError::InvalidFilename(_) => 400,
            BlobError::UnsupportedType(_) => 400,
            BlobError::TooLarge { .. } => 400,
            BlobError::IoError(_) => 500,
        }
    }
}
