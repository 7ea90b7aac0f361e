// --- File: crates/inkwell_blob/src/store.rs ---
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::debug;

use crate::error::BlobError;
use inkwell_common::services::{BlobStore, BoxFuture};
use inkwell_config::AppConfig;

/// File extensions accepted for reference images.
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "heic", "pdf"];

/// Filesystem implementation of the blob store.
///
/// Files land under `<upload_dir>/<booking_id>/<sanitized_name>` and the
/// returned reference is the path relative to the upload root.
pub struct FsBlobStore {
    root: PathBuf,
    max_file_bytes: u64,
}

impl FsBlobStore {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            root: PathBuf::from(&config.upload.dir),
            max_file_bytes: config.upload.max_file_bytes,
        }
    }

    #[cfg(test)]
    pub fn with_root(root: PathBuf, max_file_bytes: u64) -> Self {
        Self {
            root,
            max_file_bytes,
        }
    }
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Strips any directory components, then keeps only ASCII alphanumerics,
/// dots, dashes and underscores. Rejects names whose stem is empty and
/// extensions outside the allow-list.
pub fn sanitize_filename(raw: &str) -> Result<String, BlobError> {
    let basename = Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BlobError::InvalidFilename(raw.to_string()))?;

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Leading dots would make the file hidden or extension-only.
    let cleaned = cleaned.trim_start_matches('.').to_string();

    let (stem, ext) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_ascii_lowercase()),
        None => return Err(BlobError::InvalidFilename(raw.to_string())),
    };
    if stem.is_empty() {
        return Err(BlobError::InvalidFilename(raw.to_string()));
    }
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(BlobError::UnsupportedType(ext));
    }

    Ok(format!("{}.{}", stem, ext))
}

impl BlobStore for FsBlobStore {
    type Error = BlobError;

    fn store(
        &self,
        booking_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, String, Self::Error> {
        let booking_id = booking_id.to_string();
        let filename = filename.to_string();
        Box::pin(async move {
            let size = bytes.len() as u64;
            if size > self.max_file_bytes {
                return Err(BlobError::TooLarge {
                    size,
                    limit: self.max_file_bytes,
                });
            }

            let name = sanitize_filename(&filename)?;
            let dir = self.root.join(&booking_id);
            fs::create_dir_all(&dir).await?;
            fs::write(dir.join(&name), bytes).await?;

            debug!(booking_id = %booking_id, file = %name, size, "stored reference file");
            Ok(format!("{}/{}", booking_id, name))
        })
    }
}
