//! # Quill Shared
//!
//! Wire types shared between the API server and clients: response envelopes
//! and DTOs with the camelCase field names the HTTP surface exposes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PageMeta};
