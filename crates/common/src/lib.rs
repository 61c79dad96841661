//! Shared utilities, configuration, and error handling for Parley
//!
//! This crate provides common functionality used across the Parley backend:
//! - Configuration management following 12-factor principles
//! - Error types and their JSON representation
//! - Validating request extractors and pagination arithmetic
//! - Database pool bootstrap and migrations

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod response;

pub use db::RepositoryError;
pub use error::{Error, FieldError, Result};
pub use extractors::{PageQuery, ValidatedJson, ValidatedPath, ValidatedQuery};
pub use response::{ApiResponse, PageInfo, PageRequest};
