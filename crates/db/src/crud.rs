//! Generic get, list, update, and delete paths shared by every repository.
//!
//! Each path is statement, then operation, then guard. Repositories add the
//! parent scope and the resource-specific payload handling on top.

use crm_core::guard::{assert_absent, assert_present};
use crm_shared::{
    AppError, AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{Condition, ConnectionTrait};
use uuid::Uuid;

use crate::{
    audit::Audited,
    operations,
    statement::{self, Assignments},
};

/// Fetches the live row with `uuid` inside `scope`.
///
/// # Errors
///
/// Returns the resource's `NotExist` when no live row matches.
pub async fn get<E, C>(db: &C, scope: Condition, uuid: Uuid) -> AppResult<E::Model>
where
    E: Audited,
    C: ConnectionTrait,
{
    let found = operations::fetch_one(db, statement::select_one::<E>(scope, uuid)).await?;
    assert_present(found, AppError::NotExist(E::RESOURCE))
}

/// Fetches one page of live rows inside `scope`.
///
/// # Errors
///
/// Returns the resource's `NotExist` when the page is empty.
pub async fn list<E, C>(db: &C, scope: Condition, page: PageRequest) -> AppResult<Page<E::Model>>
where
    E: Audited,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let total =
        operations::fetch_count(db, statement::select_matching::<E>(scope.clone())).await?;
    let rows = operations::fetch_all(db, statement::select_page::<E>(scope, page)).await?;
    let rows = assert_present(rows, AppError::NotExist(E::RESOURCE))?;
    Ok(Page::new(rows, page, total))
}

/// Fetches the live rows with the given uuids, in id order.
///
/// # Errors
///
/// Returns `AppError::Database` on storage failure.
pub async fn get_many<E, C>(db: &C, uuids: Vec<Uuid>) -> AppResult<Vec<E::Model>>
where
    E: Audited,
    C: ConnectionTrait,
{
    if uuids.is_empty() {
        return Ok(Vec::new());
    }
    operations::fetch_all(db, statement::select_by_uuids::<E>(uuids)).await
}

/// Fails when a live row matches the duplicate key `key`.
///
/// # Errors
///
/// Returns the resource's `Exists` when a live duplicate is found.
pub async fn ensure_absent<E, C>(db: &C, key: Condition) -> AppResult<()>
where
    E: Audited,
    C: ConnectionTrait,
{
    let found = operations::fetch_one(db, statement::select_matching::<E>(key)).await?;
    assert_absent(found, AppError::Exists(E::RESOURCE))
}

/// Applies `patch` to the live row with `uuid` and returns the stored row.
///
/// # Errors
///
/// Returns the resource's `NotExist` when no live row matches.
pub async fn update<E, C>(
    db: &C,
    scope: Condition,
    uuid: Uuid,
    patch: Assignments<E>,
    actor: Uuid,
) -> AppResult<E::Model>
where
    E: Audited,
    C: ConnectionTrait,
{
    let rows =
        operations::update_returning(db, statement::update::<E>(scope, uuid, patch, actor)).await?;
    assert_present(rows.into_iter().next(), AppError::NotExist(E::RESOURCE))
}

/// Soft-deletes the live row with `uuid` and returns it as deleted.
///
/// # Errors
///
/// Returns the resource's `NotExist` when no live row matches, including a
/// row that was already deleted.
pub async fn soft_delete<E, C>(db: &C, scope: Condition, uuid: Uuid, actor: Uuid) -> AppResult<E::Model>
where
    E: Audited,
    C: ConnectionTrait,
{
    let rows =
        operations::update_returning(db, statement::soft_delete::<E>(scope, uuid, actor)).await?;
    assert_present(rows.into_iter().next(), AppError::NotExist(E::RESOURCE))
}
