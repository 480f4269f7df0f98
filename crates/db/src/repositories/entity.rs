//! Entity repository for the polymorphic parent rows.
//!
//! An entity is created together with its child row, see
//! [`crate::orchestrators::entities`]. This repository only handles the
//! parent row itself.

use crm_core::{entity::EntityKind, patch};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::entities, operations, statement::Assignments};

/// Input for updating an entity. The entity type is fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntityInput {
    /// Tax identifier. A blank value clears it.
    pub tin: Option<String>,
}

/// Entity repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct EntityRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EntityRepository<'a, C> {
    /// Creates a new entity repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live entity.
    ///
    /// # Errors
    ///
    /// Returns `Entity` NotExist if no live entity has this uuid.
    pub async fn get(&self, uuid: Uuid) -> AppResult<entities::Model> {
        crud::get::<entities::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live entities.
    ///
    /// # Errors
    ///
    /// Returns `Entity` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<entities::Model>> {
        crud::list::<entities::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Fetches the live entities with the given uuids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn get_many(&self, uuids: Vec<Uuid>) -> AppResult<Vec<entities::Model>> {
        crud::get_many::<entities::Entity, _>(self.db, uuids).await
    }

    /// Inserts the parent row of a new entity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the insert fails.
    pub async fn insert(
        &self,
        kind: EntityKind,
        tin: Option<String>,
        actor: Uuid,
    ) -> AppResult<entities::Model> {
        let model = entities::ActiveModel {
            entity_type: Set(kind.as_str().to_string()),
            tin: Set(tin),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates the tax identifier of an entity.
    ///
    /// # Errors
    ///
    /// Returns `Entity` NotExist if no live entity has this uuid.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateEntityInput,
        actor: Uuid,
    ) -> AppResult<entities::Model> {
        let patch = Assignments::<entities::Entity>::new().change(entities::Column::Tin, patch::text(input.tin));
        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes an entity. Child rows are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `Entity` NotExist if no live entity has this uuid.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<entities::Model> {
        crud::soft_delete::<entities::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log};

    #[tokio::test]
    async fn test_update_touches_only_tin() {
        let db = mock()
            .append_query_results([Vec::<entities::Model>::new()])
            .into_connection();

        let _ = EntityRepository::new(&db)
            .update(
                Uuid::nil(),
                UpdateEntityInput {
                    tin: Some("12-3456789".to_string()),
                },
                ACTOR,
            )
            .await;

        let log = sql_log(db);
        assert!(log.contains(r#""tin" = $"#));
        assert!(!log.contains(r#""type" = $"#));
    }

    #[tokio::test]
    async fn test_get_many_skips_query_for_no_uuids() {
        let db = mock().into_connection();
        let rows = EntityRepository::new(&db).get_many(Vec::new()).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(sql_log(db), "[]");
    }
}
