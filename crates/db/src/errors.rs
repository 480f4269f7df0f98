//! Mapping from `SeaORM` failures to [`AppError`].

use crm_shared::{AppError, Resource};
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

/// Wraps a storage failure as an unhandled database error.
#[must_use]
pub fn storage(err: DbErr) -> AppError {
    error!(error = %err, "database operation failed");
    AppError::Database(err.to_string())
}

/// Maps a failed insert or update of `resource`.
///
/// A unique index violation means a live duplicate slipped past the guard
/// lookup and surfaces as `Exists`. A foreign key violation means a parent
/// uuid in the payload names no row.
pub fn write_error(resource: Resource) -> impl Fn(DbErr) -> AppError {
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(%resource, %detail, "unique index rejected duplicate");
            AppError::Exists(resource)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            warn!(%resource, %detail, "foreign key rejected write");
            AppError::Validation("referenced record does not exist".to_string())
        }
        _ => storage(err),
    }
}
