//! Shared types, errors, and configuration for VetBill.
//!
//! This crate provides common types used across all other crates:
//! - Wire-amount coercion for number-or-string decimal fields
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ServerConfig};
pub use error::AppError;
