//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{InvoiceItemRepository, InvoiceRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use vetbill_shared::DatabaseConfig;

/// Opens the connection pool described by the database configuration.
///
/// Per-statement sqlx logging is off; request-level tracing on the router
/// covers the useful part of that signal.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}
