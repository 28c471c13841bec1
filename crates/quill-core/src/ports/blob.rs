//! Blob store port - opaque binary storage returning retrievable references.

use async_trait::async_trait;

/// An uploaded file carried through the write pipeline.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Blob store - persists a binary file and returns a retrievable reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return the reference to persist on the post.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobError>;

    /// Remove a previously stored blob.
    async fn remove(&self, reference: &str) -> Result<(), BlobError>;

    /// Whether `reference` points into this store (as opposed to an external
    /// URL supplied by a client).
    fn is_local(&self, reference: &str) -> bool;
}

/// Blob store errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid blob reference: {0}")]
    InvalidReference(String),
}
