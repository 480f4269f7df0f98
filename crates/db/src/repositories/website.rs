//! Website repository.

use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::websites, operations, statement::Assignments};

/// Input for adding a website to an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWebsiteInput {
    /// Website type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// Address of the site.
    pub url: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Input for updating a website.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWebsiteInput {
    /// Website type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// Address of the site, never cleared.
    pub url: Option<String>,
    /// Free-form description. A blank value clears it.
    pub description: Option<String>,
}

/// Website repository, scoped by entity.
#[derive(Debug, Clone, Copy)]
pub struct WebsiteRepository<'a, C> {
    db: &'a C,
}

fn scope(entity_uuid: Uuid) -> Condition {
    Condition::all().add(websites::Column::EntityUuid.eq(entity_uuid))
}

impl<'a, C: ConnectionTrait> WebsiteRepository<'a, C> {
    /// Creates a new website repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live website of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Website` NotExist if missing.
    pub async fn get(&self, entity_uuid: Uuid, uuid: Uuid) -> AppResult<websites::Model> {
        crud::get::<websites::Entity, _>(self.db, scope(entity_uuid), uuid).await
    }

    /// Lists live websites of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Website` NotExist if the page is empty.
    pub async fn list(&self, entity_uuid: Uuid, page: PageRequest) -> AppResult<Page<websites::Model>> {
        crud::list::<websites::Entity, _>(self.db, scope(entity_uuid), page).await
    }

    /// Adds a website to the entity.
    ///
    /// # Errors
    ///
    /// Returns `Website` Exists if the entity already lists this url.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        input: CreateWebsiteInput,
        actor: Uuid,
    ) -> AppResult<websites::Model> {
        let url = patch::required("url", input.url)?;
        crud::ensure_absent::<websites::Entity, _>(
            self.db,
            scope(entity_uuid).add(websites::Column::Url.eq(url.as_str())),
        )
        .await?;

        let model = websites::ActiveModel {
            entity_uuid: Set(entity_uuid),
            sys_value_type_uuid: Set(input.sys_value_type_uuid),
            url: Set(url),
            description: Set(patch::optional_text(input.description)),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a website.
    ///
    /// # Errors
    ///
    /// Returns `Website` NotExist if missing.
    pub async fn update(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        input: UpdateWebsiteInput,
        actor: Uuid,
    ) -> AppResult<websites::Model> {
        let patch = Assignments::<websites::Entity>::new()
            .change(
                websites::Column::SysValueTypeUuid,
                patch::value(input.sys_value_type_uuid),
            )
            .change(websites::Column::Url, patch::required_text("url", input.url)?)
            .change(websites::Column::Description, patch::text(input.description));

        crud::update(self.db, scope(entity_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a website.
    ///
    /// # Errors
    ///
    /// Returns `Website` NotExist if missing.
    pub async fn delete(&self, entity_uuid: Uuid, uuid: Uuid, actor: Uuid) -> AppResult<websites::Model> {
        crud::soft_delete::<websites::Entity, _>(self.db, scope(entity_uuid), uuid, actor).await
    }
}
