//! Blob storage backends.

mod disk;

pub use disk::{DiskBlobStore, PUBLIC_PREFIX};
