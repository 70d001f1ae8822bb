//! Common utilities shared across the taxi service crates.
//!
//! This crate provides:
//! - Unified error handling with HTTP rendering
//! - Configuration structures
//! - Pagination parameters

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, FieldErrors, OptionExt, LICENSE_NUMBER_FIELD};
pub use pagination::PaginationParams;
