//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob;
mod repository;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use blob::{BlobError, BlobStore, Upload};
pub use repository::{CategoryRepository, PostFilter, PostRepository, PostWithCategory};
