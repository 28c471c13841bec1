//! On-disk blob store backing image uploads.
//!
//! Files land in a single uploads directory under a
//! `<millis>-<random>-<sanitized original name>` filename and are served
//! statically under [`PUBLIC_PREFIX`].

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quill_core::ports::{BlobError, BlobStore};

/// URL prefix under which stored blobs are served.
pub static PUBLIC_PREFIX: &str = "/uploads";

/// Blob store writing to a local directory.
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keep only filesystem-safe characters from a client-supplied filename.
    fn sanitize(filename: &str) -> String {
        let safe: String = filename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();

        if safe.trim_matches('-').is_empty() {
            "file".to_string()
        } else {
            safe
        }
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;

        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            &suffix[..8],
            Self::sanitize(filename)
        );

        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;

        tracing::debug!(file = %name, size = bytes.len(), "stored upload");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    async fn remove(&self, reference: &str) -> Result<(), BlobError> {
        let name = reference
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| BlobError::InvalidReference(reference.to_string()))?;

        // The reference must name a file directly inside the uploads dir.
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(BlobError::InvalidReference(reference.to_string()));
        }

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Unavailable(e.to_string())),
        }
    }

    fn is_local(&self, reference: &str) -> bool {
        reference.starts_with(PUBLIC_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> DiskBlobStore {
        let dir = std::env::temp_dir().join(format!("quill-blob-test-{}", Uuid::new_v4()));
        DiskBlobStore::new(dir)
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(DiskBlobStore::sanitize("my cat photo.png"), "my-cat-photo.png");
        assert_eq!(DiskBlobStore::sanitize("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(DiskBlobStore::sanitize("###"), "file");
    }

    #[tokio::test]
    async fn store_then_remove_round_trip() {
        let store = temp_store();

        let reference = store.store("pic.png", &[1, 2, 3]).await.unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with("pic.png"));
        assert!(store.is_local(&reference));

        let on_disk = store.root.join(reference.strip_prefix("/uploads/").unwrap());
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), vec![1, 2, 3]);

        store.remove(&reference).await.unwrap();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn remove_rejects_traversal() {
        let store = temp_store();

        let result = store.remove("/uploads/../secret").await;
        assert!(matches!(result, Err(BlobError::InvalidReference(_))));

        let result = store.remove("https://cdn.example.com/x.png").await;
        assert!(matches!(result, Err(BlobError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn remove_of_missing_file_is_ok() {
        let store = temp_store();
        tokio::fs::create_dir_all(&store.root).await.unwrap();

        assert!(store.remove("/uploads/never-existed.png").await.is_ok());
    }
}
