//! Soft-delete-aware statement builders.
//!
//! Builders only construct queries. Every read is restricted to live rows
//! (`sys_deleted_at IS NULL`) and every write targets a single live row by
//! `uuid` inside the caller's parent scope. Soft delete is an update of the
//! deletion columns, so a row deleted once is invisible to a second delete.

use crm_core::patch::Change;
use crm_shared::types::PageRequest;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, UpdateMany,
    Value,
    sea_query::{Expr, SimpleExpr},
};
use uuid::Uuid;

use crate::audit::Audited;

/// Predicate selecting rows that have not been soft-deleted.
#[must_use]
pub fn live<E: Audited>() -> Condition {
    Condition::all().add(E::deleted_at_column().is_null())
}

/// Matches `column` against a nullable value, `None` meaning `IS NULL`.
#[must_use]
pub fn eq_nullable<C, V>(column: C, value: Option<V>) -> SimpleExpr
where
    C: ColumnTrait,
    V: Into<Value>,
{
    match value {
        Some(v) => column.eq(v),
        None => column.is_null(),
    }
}

fn scoped<E: Audited>(scope: Condition) -> Select<E> {
    E::find().filter(live::<E>()).filter(scope)
}

/// Selects the live row with `uuid` inside `scope`.
#[must_use]
pub fn select_one<E: Audited>(scope: Condition, uuid: Uuid) -> Select<E> {
    scoped::<E>(scope).filter(E::uuid_column().eq(uuid))
}

/// Selects one page of live rows inside `scope`, ordered by surrogate id.
#[must_use]
pub fn select_page<E: Audited>(scope: Condition, page: PageRequest) -> Select<E> {
    scoped::<E>(scope)
        .order_by_asc(E::id_column())
        .limit(page.limit())
        .offset(page.offset())
}

/// Selects every live row inside `scope`, for counting or duplicate lookups.
#[must_use]
pub fn select_matching<E: Audited>(scope: Condition) -> Select<E> {
    scoped::<E>(scope)
}

/// Selects the live rows whose `uuid` is listed.
#[must_use]
pub fn select_by_uuids<E: Audited>(uuids: Vec<Uuid>) -> Select<E> {
    scoped::<E>(Condition::all())
        .filter(E::uuid_column().is_in(uuids))
        .order_by_asc(E::id_column())
}

/// Column assignments of a patch, skipping every field left as [`Change::Keep`].
#[derive(Debug)]
pub struct Assignments<E: EntityTrait> {
    columns: Vec<(E::Column, SimpleExpr)>,
}

impl<E: EntityTrait> Default for Assignments<E> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<E: EntityTrait> Assignments<E> {
    /// Starts an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the assignment for one column.
    #[must_use]
    pub fn change<V>(mut self, column: E::Column, change: Change<V>) -> Self
    where
        Option<V>: Into<Value>,
    {
        if let Some(value) = change.into_assignment() {
            self.columns.push((column, SimpleExpr::Value(value.into())));
        }
        self
    }

    /// Number of columns the patch touches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the patch touches no column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn target<E: Audited>(scope: Condition, uuid: Uuid) -> UpdateMany<E> {
    E::update_many()
        .filter(live::<E>())
        .filter(scope)
        .filter(E::uuid_column().eq(uuid))
}

/// Updates the live row with `uuid`, stamping the update columns with `actor`.
#[must_use]
pub fn update<E: Audited>(
    scope: Condition,
    uuid: Uuid,
    patch: Assignments<E>,
    actor: Uuid,
) -> UpdateMany<E> {
    patch
        .columns
        .into_iter()
        .fold(target::<E>(scope, uuid), |query, (column, expr)| {
            query.col_expr(column, expr)
        })
        .col_expr(E::updated_at_column(), Expr::current_timestamp().into())
        .col_expr(E::updated_by_column(), SimpleExpr::Value(actor.into()))
}

/// Marks the live row with `uuid` as deleted by `actor`.
#[must_use]
pub fn soft_delete<E: Audited>(scope: Condition, uuid: Uuid, actor: Uuid) -> UpdateMany<E> {
    target::<E>(scope, uuid)
        .col_expr(E::deleted_at_column(), Expr::current_timestamp().into())
        .col_expr(E::deleted_by_column(), SimpleExpr::Value(actor.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{addresses, emails};
    use sea_orm::{DbBackend, QueryTrait};

    fn entity_scope(entity_uuid: Uuid) -> Condition {
        Condition::all().add(emails::Column::EntityUuid.eq(entity_uuid))
    }

    #[test]
    fn test_select_one_filters_live_rows_in_scope() {
        let sql = select_one::<emails::Entity>(entity_scope(Uuid::nil()), Uuid::max())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""em_emails"."sys_deleted_at" IS NULL"#));
        assert!(sql.contains(r#""em_emails"."entity_uuid" = '00000000-0000-0000-0000-000000000000'"#));
        assert!(sql.contains(r#""em_emails"."uuid" = 'ffffffff-ffff-ffff-ffff-ffffffffffff'"#));
    }

    #[test]
    fn test_select_page_orders_and_offsets() {
        let page = PageRequest::new(3, 10).unwrap();
        let sql = select_page::<emails::Entity>(entity_scope(Uuid::nil()), page)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"ORDER BY "em_emails"."id" ASC"#));
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn test_update_skips_kept_fields_and_nulls_cleared_ones() {
        let patch = Assignments::<addresses::Entity>::new()
            .change(addresses::Column::AddressLine1, Change::<String>::Keep)
            .change(addresses::Column::AddressLine2, Change::<String>::Clear)
            .change(addresses::Column::City, Change::Set("Oakland".to_string()));
        assert_eq!(patch.len(), 2);

        let sql = update::<addresses::Entity>(Condition::all(), Uuid::nil(), patch, Uuid::max())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains(r#""address_line1" ="#));
        assert!(sql.contains(r#""address_line2" = NULL"#));
        assert!(sql.contains(r#""city" = 'Oakland'"#));
        assert!(sql.contains(r#""sys_updated_at" = CURRENT_TIMESTAMP"#));
        assert!(sql.contains(r#""sys_deleted_at" IS NULL"#));
    }

    #[test]
    fn test_soft_delete_sets_deletion_columns_on_live_row() {
        let sql = soft_delete::<emails::Entity>(entity_scope(Uuid::nil()), Uuid::max(), Uuid::nil())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.starts_with(r#"UPDATE "sales"."em_emails" SET "sys_deleted_at" = CURRENT_TIMESTAMP"#));
        assert!(sql.contains(r#""sys_deleted_by" = '00000000-0000-0000-0000-000000000000'"#));
        assert!(sql.contains(r#"WHERE "em_emails"."sys_deleted_at" IS NULL"#));
    }

    #[test]
    fn test_eq_nullable() {
        let sql = addresses::Entity::find()
            .filter(eq_nullable(addresses::Column::AddressLine2, None::<String>))
            .filter(eq_nullable(addresses::Column::City, Some("Oakland")))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""address_line2" IS NULL"#));
        assert!(sql.contains(r#""city" = 'Oakland'"#));
    }
}
