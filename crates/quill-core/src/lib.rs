//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod media;
pub mod ports;
pub mod service;
pub mod slug;

pub use error::DomainError;
