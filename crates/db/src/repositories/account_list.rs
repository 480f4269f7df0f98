//! Account list repository, linking accounts to product lists.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::account_lists, operations, statement::Assignments};

/// Input for linking a product list to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountListInput {
    /// Linked product list.
    pub product_list_uuid: Uuid,
    /// First day of the link.
    pub start_on: Option<NaiveDate>,
    /// Last day of the link.
    pub end_on: Option<NaiveDate>,
}

/// Input for updating an account list link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountListInput {
    /// First day of the link.
    pub start_on: Option<NaiveDate>,
    /// Last day of the link.
    pub end_on: Option<NaiveDate>,
}

/// Account list repository, scoped by account.
#[derive(Debug, Clone, Copy)]
pub struct AccountListRepository<'a, C> {
    db: &'a C,
}

fn scope(account_uuid: Uuid) -> Condition {
    Condition::all().add(account_lists::Column::AccountUuid.eq(account_uuid))
}

impl<'a, C: ConnectionTrait> AccountListRepository<'a, C> {
    /// Creates a new account list repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live link of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountList` NotExist if the link is missing.
    pub async fn get(&self, account_uuid: Uuid, uuid: Uuid) -> AppResult<account_lists::Model> {
        crud::get::<account_lists::Entity, _>(self.db, scope(account_uuid), uuid).await
    }

    /// Lists live links of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountList` NotExist if the page is empty.
    pub async fn list(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<account_lists::Model>> {
        crud::list::<account_lists::Entity, _>(self.db, scope(account_uuid), page).await
    }

    /// Links a product list to the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountList` Exists if the product list is already linked.
    pub async fn create(
        &self,
        account_uuid: Uuid,
        input: CreateAccountListInput,
        actor: Uuid,
    ) -> AppResult<account_lists::Model> {
        crud::ensure_absent::<account_lists::Entity, _>(
            self.db,
            scope(account_uuid)
                .add(account_lists::Column::ProductListUuid.eq(input.product_list_uuid)),
        )
        .await?;

        let model = account_lists::ActiveModel {
            account_uuid: Set(account_uuid),
            product_list_uuid: Set(input.product_list_uuid),
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
    /// Returns `AccountList` NotExist if the link is missing.
    pub async fn update(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        input: UpdateAccountListInput,
        actor: Uuid,
    ) -> AppResult<account_lists::Model> {
        let patch = Assignments::<account_lists::Entity>::new()
            .change(account_lists::Column::StartOn, patch::value(input.start_on))
            .change(account_lists::Column::EndOn, patch::value(input.end_on));

        crud::update(self.db, scope(account_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a link.
    ///
    /// # Errors
    ///
    /// Returns `AccountList` NotExist if the link is missing.
    pub async fn delete(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<account_lists::Model> {
        crud::soft_delete::<account_lists::Entity, _>(self.db, scope(account_uuid), uuid, actor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};

    const ACCOUNT: Uuid = Uuid::from_u128(0x10);

    fn link(end_on: Option<NaiveDate>) -> account_lists::Model {
        account_lists::Model {
            id: 4,
            uuid: Uuid::from_u128(0x40),
            account_uuid: ACCOUNT,
            product_list_uuid: Uuid::from_u128(0x21),
            start_on: NaiveDate::from_ymd_opt(2026, 1, 1),
            end_on,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: Some(stamp()),
            sys_updated_by: Some(ACTOR),
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    #[tokio::test]
    async fn test_update_sets_only_sent_dates() {
        let end_on = NaiveDate::from_ymd_opt(2026, 12, 31);
        let db = mock()
            .append_query_results([vec![link(end_on)]])
            .into_connection();

        let updated = AccountListRepository::new(&db)
            .update(
                ACCOUNT,
                Uuid::from_u128(0x40),
                UpdateAccountListInput {
                    start_on: None,
                    end_on,
                },
                ACTOR,
            )
            .await
            .unwrap();
        assert_eq!(updated.end_on, end_on);

        let log = sql_log(db);
        assert!(log.contains(r#""end_on" = $"#));
        assert!(!log.contains(r#""start_on" = $"#));
        assert!(log.contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_update_of_missing_link_is_not_exist() {
        let db = mock()
            .append_query_results([Vec::<account_lists::Model>::new()])
            .into_connection();

        let result = AccountListRepository::new(&db)
            .update(ACCOUNT, Uuid::nil(), UpdateAccountListInput::default(), ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::AccountList))));
    }
}
