//! The single seam through which repositories touch storage.
//!
//! Each helper logs the statement it runs and maps failures into
//! [`AppError`]. Nothing here knows about business rules.

use crm_shared::{AppError, AppResult};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryTrait, Select, UpdateMany,
};
use tracing::debug;

use crate::{
    audit::Audited,
    errors::{storage, write_error},
};

/// Runs `query` and returns its first row.
///
/// # Errors
///
/// Returns `AppError::Database` on storage failure.
pub async fn fetch_one<E, C>(db: &C, query: Select<E>) -> AppResult<Option<E::Model>>
where
    E: Audited,
    C: ConnectionTrait,
{
    debug!(resource = %E::RESOURCE, sql = %query.build(db.get_database_backend()), "fetch one");
    query.one(db).await.map_err(storage)
}

/// Runs `query` and returns every row.
///
/// # Errors
///
/// Returns `AppError::Database` on storage failure.
pub async fn fetch_all<E, C>(db: &C, query: Select<E>) -> AppResult<Vec<E::Model>>
where
    E: Audited,
    C: ConnectionTrait,
{
    debug!(resource = %E::RESOURCE, sql = %query.build(db.get_database_backend()), "fetch all");
    query.all(db).await.map_err(storage)
}

/// Counts the rows `query` would return.
///
/// # Errors
///
/// Returns `AppError::Database` on storage failure.
pub async fn fetch_count<E, C>(db: &C, query: Select<E>) -> AppResult<u64>
where
    E: Audited,
    E::Model: Sync,
    C: ConnectionTrait,
{
    debug!(resource = %E::RESOURCE, sql = %query.build(db.get_database_backend()), "fetch count");
    query.count(db).await.map_err(storage)
}

/// Inserts one row and returns it as stored, including generated keys.
///
/// # Errors
///
/// Returns `AppError::Exists` on a unique violation, `AppError::Validation` on
/// a dangling foreign key, and `AppError::Database` otherwise.
pub async fn insert_one<A, C>(db: &C, model: A) -> AppResult<<A::Entity as EntityTrait>::Model>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    A::Entity: Audited,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let resource = <A::Entity as Audited>::RESOURCE;
    debug!(%resource, "insert one");
    model.insert(db).await.map_err(write_error(resource))
}

/// Inserts rows one at a time, in order, returning them as stored.
///
/// Callers run this inside a transaction when the batch must be atomic.
///
/// # Errors
///
/// Fails on the first row that fails, see [`insert_one`].
pub async fn insert_many<A, C>(
    db: &C,
    models: Vec<A>,
) -> AppResult<Vec<<A::Entity as EntityTrait>::Model>>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    A::Entity: Audited,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    debug!(resource = %<A::Entity as Audited>::RESOURCE, rows = models.len(), "insert many");
    let mut stored = Vec::with_capacity(models.len());
    for model in models {
        stored.push(insert_one(db, model).await?);
    }
    Ok(stored)
}

/// Runs an update and returns the rows it touched.
///
/// # Errors
///
/// See [`insert_one`].
pub async fn update_returning<E, C>(db: &C, query: UpdateMany<E>) -> AppResult<Vec<E::Model>>
where
    E: Audited,
    C: ConnectionTrait,
{
    debug!(resource = %E::RESOURCE, sql = %query.build(db.get_database_backend()), "update");
    query
        .exec_with_returning(db)
        .await
        .map_err(write_error(E::RESOURCE))
}

