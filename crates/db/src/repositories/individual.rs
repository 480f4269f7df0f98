//! Individual repository for person entities.

use crm_core::{
    entity::{EntityKind, NewIndividual, ensure_kind},
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
    entities::individuals,
    operations,
    statement::{self, Assignments},
};

/// Input for creating an individual under an existing entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIndividualInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
}

/// Input for updating an individual.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIndividualInput {
    /// First name, never cleared.
    pub first_name: Option<String>,
    /// Last name. A blank value clears it.
    pub last_name: Option<String>,
}

/// Individual repository, scoped by entity.
#[derive(Debug, Clone, Copy)]
pub struct IndividualRepository<'a, C> {
    db: &'a C,
}

fn scope(entity_uuid: Uuid) -> Condition {
    Condition::all().add(individuals::Column::EntityUuid.eq(entity_uuid))
}

impl<'a, C: ConnectionTrait> IndividualRepository<'a, C> {
    /// Creates a new individual repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds the live individual of an entity.
    ///
    /// # Errors
    ///
    /// Returns `Individual` NotExist if missing, which includes every
    /// non-individual entity.
    pub async fn get(&self, entity_uuid: Uuid, uuid: Uuid) -> AppResult<individuals::Model> {
        crud::get::<individuals::Entity, _>(self.db, scope(entity_uuid), uuid).await
    }

    /// Lists the live individuals of an entity.
    ///
    /// # Errors
    ///
    /// Returns `Individual` NotExist if the page is empty.
    pub async fn list(
        &self,
        entity_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<individuals::Model>> {
        crud::list::<individuals::Entity, _>(self.db, scope(entity_uuid), page).await
    }

    /// Fetches the live individuals of the given entities.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn for_entities(
        &self,
        entity_uuids: Vec<Uuid>,
    ) -> AppResult<Vec<individuals::Model>> {
        if entity_uuids.is_empty() {
            return Ok(Vec::new());
        }
        operations::fetch_all(
            self.db,
            statement::select_matching::<individuals::Entity>(
                Condition::all().add(individuals::Column::EntityUuid.is_in(entity_uuids)),
            ),
        )
        .await
    }

    /// Creates the individual of an existing entity.
    ///
    /// # Errors
    ///
    /// - `Entity` NotExist if the entity is missing.
    /// - `EntityTypeInvalid` if the entity is a non-individual.
    /// - `Individual` Exists if the entity already has a live individual.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        input: CreateIndividualInput,
        actor: Uuid,
    ) -> AppResult<individuals::Model> {
        let individual = NewIndividual {
            first_name: patch::required("first_name", input.first_name)?,
            last_name: patch::optional_text(input.last_name),
        };

        let entity = EntityRepository::new(self.db).get(entity_uuid).await?;
        ensure_kind(&entity.entity_type, EntityKind::Individual)?;
        crud::ensure_absent::<individuals::Entity, _>(self.db, scope(entity_uuid)).await?;

        self.insert(entity_uuid, individual, actor).await
    }

    /// Inserts the individual row of a new entity.
    ///
    /// # Errors
    ///
    /// Returns `Individual` Exists on a unique violation.
    pub async fn insert(
        &self,
        entity_uuid: Uuid,
        individual: NewIndividual,
        actor: Uuid,
    ) -> AppResult<individuals::Model> {
        let model = individuals::ActiveModel {
            entity_uuid: Set(entity_uuid),
            first_name: Set(individual.first_name),
            last_name: Set(individual.last_name),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an individual.
    ///
    /// # Errors
    ///
    /// Returns `Individual` NotExist if missing, or a validation error for a
    /// blank first name.
    pub async fn update(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        input: UpdateIndividualInput,
        actor: Uuid,
    ) -> AppResult<individuals::Model> {
        let patch = Assignments::<individuals::Entity>::new()
            .change(
                individuals::Column::FirstName,
                patch::required_text("first_name", input.first_name)?,
            )
            .change(individuals::Column::LastName, patch::text(input.last_name));

        crud::update(self.db, scope(entity_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes an individual.
    ///
    /// # Errors
    ///
    /// Returns `Individual` NotExist if missing.
    pub async fn delete(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<individuals::Model> {
        crud::soft_delete::<individuals::Entity, _>(self.db, scope(entity_uuid), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::entities,
        test_support::{ACTOR, mock, sql_log, stamp},
    };
    use crm_shared::AppError;

    const ENTITY: Uuid = Uuid::from_u128(0xE1);

    fn entity(kind: EntityKind) -> entities::Model {
        entities::Model {
            id: 1,
            uuid: ENTITY,
            entity_type: kind.as_str().to_string(),
            tin: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn input() -> CreateIndividualInput {
        CreateIndividualInput {
            first_name: "Ada".to_string(),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_individual_under_organization_is_type_invalid() {
        let db = mock()
            .append_query_results([vec![entity(EntityKind::NonIndividual)]])
            .into_connection();

        let result = IndividualRepository::new(&db).create(ENTITY, input(), ACTOR).await;
        assert!(matches!(result, Err(AppError::EntityTypeInvalid)));
        assert!(!sql_log(db).contains("INSERT"));
    }

    #[tokio::test]
    async fn test_second_individual_is_rejected() {
        let existing = individuals::Model {
            id: 1,
            uuid: Uuid::from_u128(0x11),
            entity_uuid: ENTITY,
            first_name: "Ada".to_string(),
            last_name: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        };
        let db = mock()
            .append_query_results([vec![entity(EntityKind::Individual)]])
            .append_query_results([vec![existing]])
            .into_connection();

        let result = IndividualRepository::new(&db).create(ENTITY, input(), ACTOR).await;
        assert!(matches!(
            result,
            Err(AppError::Exists(crm_shared::Resource::Individual))
        ));
    }

    #[tokio::test]
    async fn test_blank_first_name_is_rejected_on_update() {
        let db = mock().into_connection();
        let input = UpdateIndividualInput {
            first_name: Some(String::new()),
            last_name: None,
        };

        let result = IndividualRepository::new(&db)
            .update(ENTITY, Uuid::nil(), input, ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
