//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM/Postgres repositories, JWT bearer-token verification, and the
//! on-disk blob store backing image uploads.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM

pub mod auth;
pub mod blob;
pub mod database;

pub use auth::{JwtConfig, JwtTokenService};
pub use blob::DiskBlobStore;
pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository};
