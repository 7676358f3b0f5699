//! Shared utilities, configuration, and error handling for Kolab
//!
//! This crate provides common functionality used across the Kolab application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - State machine error types shared by the lifecycle domain
//! - Common axum extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use state::StateError;
