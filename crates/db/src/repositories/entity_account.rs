//! Entity account repository, linking entities to accounts.
//!
//! Links are reachable from both sides, so every query is scoped by either
//! the entity or the account.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::entity_accounts::{self, Column},
    operations,
    statement::Assignments,
};

/// Side a link is looked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Links of an entity.
    Entity(Uuid),
    /// Links of an account.
    Account(Uuid),
}

impl LinkScope {
    fn condition(self) -> Condition {
        match self {
            Self::Entity(uuid) => Condition::all().add(Column::EntityUuid.eq(uuid)),
            Self::Account(uuid) => Condition::all().add(Column::AccountUuid.eq(uuid)),
        }
    }
}

/// Validity window of a link, for create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityAccountInput {
    /// First day of the link.
    pub start_on: Option<NaiveDate>,
    /// Last day of the link.
    pub end_on: Option<NaiveDate>,
}

/// Entity account repository.
#[derive(Debug, Clone, Copy)]
pub struct EntityAccountRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EntityAccountRepository<'a, C> {
    /// Creates a new entity account repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live link.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if missing.
    pub async fn get(&self, scope: LinkScope, uuid: Uuid) -> AppResult<entity_accounts::Model> {
        crud::get::<entity_accounts::Entity, _>(self.db, scope.condition(), uuid).await
    }

    /// Lists live links on one side.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if the page is empty.
    pub async fn list(
        &self,
        scope: LinkScope,
        page: PageRequest,
    ) -> AppResult<Page<entity_accounts::Model>> {
        crud::list::<entity_accounts::Entity, _>(self.db, scope.condition(), page).await
    }

    /// Links an entity to an account.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` Exists if the pair is already linked.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        account_uuid: Uuid,
        input: EntityAccountInput,
        actor: Uuid,
    ) -> AppResult<entity_accounts::Model> {
        crud::ensure_absent::<entity_accounts::Entity, _>(
            self.db,
            Condition::all()
                .add(Column::EntityUuid.eq(entity_uuid))
                .add(Column::AccountUuid.eq(account_uuid)),
        )
        .await?;

        let model = entity_accounts::ActiveModel {
            entity_uuid: Set(entity_uuid),
            account_uuid: Set(account_uuid),
            start_on: Set(input.start_on),
            end_on: Set(input.end_on),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates the validity window of a link.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if missing.
    pub async fn update(
        &self,
        scope: LinkScope,
        uuid: Uuid,
        input: EntityAccountInput,
        actor: Uuid,
    ) -> AppResult<entity_accounts::Model> {
        let patch = Assignments::<entity_accounts::Entity>::new()
            .change(Column::StartOn, patch::value(input.start_on))
            .change(Column::EndOn, patch::value(input.end_on));

        crud::update(self.db, scope.condition(), uuid, patch, actor).await
    }

    /// Soft-deletes a link.
    ///
    /// # Errors
    ///
    /// Returns `EntityAccount` NotExist if missing.
    pub async fn delete(
        &self,
        scope: LinkScope,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<entity_accounts::Model> {
        crud::soft_delete::<entity_accounts::Entity, _>(self.db, scope.condition(), uuid, actor)
            .await
    }
}
