//! Non-individual repository for organization entities.

use crm_core::{
    entity::{EntityKind, NewNonIndividual, ensure_kind},
    patch,
};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use super::EntityRepository;
use crate::{
    crud,
    entities::non_individuals,
    operations,
    statement::{self, Assignments},
};

/// Input for creating a non-individual under an existing entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNonIndividualInput {
    /// Display name.
    pub name: String,
    /// Legal name.
    pub legal_name: Option<String>,
}

/// Input for updating a non-individual.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNonIndividualInput {
    /// Display name, never cleared.
    pub name: Option<String>,
    /// Legal name. A blank value clears it.
    pub legal_name: Option<String>,
}

/// Non-individual repository, scoped by entity.
#[derive(Debug, Clone, Copy)]
pub struct NonIndividualRepository<'a, C> {
    db: &'a C,
}

fn scope(entity_uuid: Uuid) -> Condition {
    Condition::all().add(non_individuals::Column::EntityUuid.eq(entity_uuid))
}

impl<'a, C: ConnectionTrait> NonIndividualRepository<'a, C> {
    /// Creates a new non-individual repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the live non-individual of an entity.
    ///
    /// # Errors
    ///
    /// Returns `NonIndividual` NotExist if missing, which includes every
    /// individual entity.
    pub async fn get(&self, entity_uuid: Uuid, uuid: Uuid) -> AppResult<non_individuals::Model> {
        crud::get::<non_individuals::Entity, _>(self.db, scope(entity_uuid), uuid).await
    }

    /// Lists the live non-individuals of an entity.
    ///
    /// # Errors
    ///
    /// Returns `NonIndividual` NotExist if the page is empty.
    pub async fn list(
        &self,
        entity_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<non_individuals::Model>> {
        crud::list::<non_individuals::Entity, _>(self.db, scope(entity_uuid), page).await
    }

    /// Fetches the live non-individuals of the given entities.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn for_entities(
        &self,
        entity_uuids: Vec<Uuid>,
    ) -> AppResult<Vec<non_individuals::Model>> {
        if entity_uuids.is_empty() {
            return Ok(Vec::new());
        }
        operations::fetch_all(
            self.db,
            statement::select_matching::<non_individuals::Entity>(
                Condition::all().add(non_individuals::Column::EntityUuid.is_in(entity_uuids)),
            ),
        )
        .await
    }

    /// Creates the non-individual of an existing entity.
    ///
    /// # Errors
    ///
    /// - `Entity` NotExist if the entity is missing.
    /// - `EntityTypeInvalid` if the entity is an individual.
    /// - `NonIndividual` Exists if the entity already has a live non-individual.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        input: CreateNonIndividualInput,
        actor: Uuid,
    ) -> AppResult<non_individuals::Model> {
        let non_individual = NewNonIndividual {
            name: patch::required("name", input.name)?,
            legal_name: patch::optional_text(input.legal_name),
        };

        let entity = EntityRepository::new(self.db).get(entity_uuid).await?;
        ensure_kind(&entity.entity_type, EntityKind::NonIndividual)?;
        crud::ensure_absent::<non_individuals::Entity, _>(self.db, scope(entity_uuid)).await?;

        self.insert(entity_uuid, non_individual, actor).await
    }

    /// Inserts the non-individual row of a new entity.
    ///
    /// # Errors
    ///
    /// Returns `NonIndividual` Exists on a unique violation.
    pub async fn insert(
        &self,
        entity_uuid: Uuid,
        non_individual: NewNonIndividual,
        actor: Uuid,
    ) -> AppResult<non_individuals::Model> {
        let model = non_individuals::ActiveModel {
            entity_uuid: Set(entity_uuid),
            name: Set(non_individual.name),
            legal_name: Set(non_individual.legal_name),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a non-individual.
    ///
    /// # Errors
    ///
    /// Returns `NonIndividual` NotExist if missing, or a validation error for a
    /// blank name.
    pub async fn update(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        input: UpdateNonIndividualInput,
        actor: Uuid,
    ) -> AppResult<non_individuals::Model> {
        let patch = Assignments::<non_individuals::Entity>::new()
            .change(
                non_individuals::Column::Name,
                patch::required_text("name", input.name)?,
            )
            .change(non_individuals::Column::LegalName, patch::text(input.legal_name));

        crud::update(self.db, scope(entity_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a non-individual.
    ///
    /// # Errors
    ///
    /// Returns `NonIndividual` NotExist if missing.
    pub async fn delete(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<non_individuals::Model> {
        crud::soft_delete::<non_individuals::Entity, _>(self.db, scope(entity_uuid), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};

    const ENTITY: Uuid = Uuid::from_u128(0xE2);

    #[tokio::test]
    async fn test_individual_entity_has_no_non_individual() {
        let db = mock()
            .append_query_results([Vec::<non_individuals::Model>::new()])
            .into_connection();

        let result = NonIndividualRepository::new(&db)
            .get(ENTITY, Uuid::from_u128(0x21))
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::NonIndividual))));
    }

    #[tokio::test]
    async fn test_blank_legal_name_clears_column() {
        let stored = non_individuals::Model {
            id: 2,
            uuid: Uuid::from_u128(0x21),
            entity_uuid: ENTITY,
            name: "Acme".to_string(),
            legal_name: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: Some(stamp()),
            sys_updated_by: Some(ACTOR),
            sys_deleted_at: None,
            sys_deleted_by: None,
        };
        let db = mock().append_query_results([vec![stored]]).into_connection();
        let input = UpdateNonIndividualInput {
            name: None,
            legal_name: Some("  ".to_string()),
        };

        let updated = NonIndividualRepository::new(&db)
            .update(ENTITY, Uuid::from_u128(0x21), input, ACTOR)
            .await
            .unwrap();
        assert_eq!(updated.legal_name, None);

        let log = sql_log(db);
        assert!(log.contains(r#""legal_name" = $"#));
        assert!(!log.contains(r#""name" = $"#));
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_exist() {
        let db = mock()
            .append_query_results([Vec::<crate::entities::entities::Model>::new()])
            .into_connection();
        let input = CreateNonIndividualInput {
            name: "Acme".to_string(),
            legal_name: None,
        };

        let result = NonIndividualRepository::new(&db)
            .create(ENTITY, input, ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::Entity))));
    }
}
