//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the `sales` schema
//! - Soft-delete-aware statement builders and the operations seam
//! - Per-resource repositories, orchestrators, and the session service
//! - Database migrations

mod audit;
mod crud;
pub mod entities;
mod errors;
pub mod migration;
pub mod operations;
pub mod orchestrators;
pub mod repositories;
pub mod statement;
#[cfg(test)]
mod test_support;

pub use audit::Audited;
pub use orchestrators::{AccountOrchestrator, EntityOrchestrator};
pub use repositories::{SessionService, SysUserRepository};

use std::time::Duration;

use crm_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
