// --- File: crates/inkwell_blob/src/store_test.rs ---
#[cfg(test)]
mod tests {
    use crate::error::BlobError;
    use crate::store::{sanitize_filename, FsBlobStore};
    use inkwell_common::services::BlobStore;

    #[test]
    fn sanitize_keeps_simple_names() {
        assert_eq!(sanitize_filename("sketch.png").unwrap(), "sketch.png");
        assert_eq!(sanitize_filename("Final Draft.JPG").unwrap(), "Final_Draft.jpg");
    }

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(
            sanitize_filename("../../etc/passwd.png").unwrap(),
            "passwd.png"
        );
    }

    #[test]
    fn sanitize_rejects_missing_or_unknown_extension() {
        assert!(matches!(
            sanitize_filename("noextension"),
            Err(BlobError::InvalidFilename(_))
        ));
        assert!(matches!(
            sanitize_filename("script.exe"),
            Err(BlobError::UnsupportedType(_))
        ));
        assert!(matches!(
            sanitize_filename(".png"),
            Err(BlobError::InvalidFilename(_))
        ));
    }

    #[tokio::test]
    async fn store_writes_under_booking_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::with_root(dir.path().to_path_buf(), 1024);

        let reference = store
            .store("b-123", "sketch.png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(reference, "b-123/sketch.png");

        let on_disk = dir.path().join("b-123").join("sketch.png");
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn store_rejects_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::with_root(dir.path().to_path_buf(), 2);

        let result = store.store("b-123", "big.png", vec![0; 3]).await;
        assert!(matches!(result, Err(BlobError::TooLarge { .. })));
    }
}
