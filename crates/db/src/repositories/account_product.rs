//! Account product repository, linking accounts to catalog products.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::account_products, operations, statement::Assignments};

/// Input for linking a product to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountProductInput {
    /// Linked product.
    pub product_uuid: Uuid,
    /// First day of the link.
    pub start_on: Option<NaiveDate>,
    /// Last day of the link.
    pub end_on: Option<NaiveDate>,
}

/// Input for updating an account product link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountProductInput {
    /// First day of the link.
    pub start_on: Option<NaiveDate>,
    /// Last day of the link.
    pub end_on: Option<NaiveDate>,
}

/// Account product repository, scoped by account.
#[derive(Debug, Clone, Copy)]
pub struct AccountProductRepository<'a, C> {
    db: &'a C,
}

fn scope(account_uuid: Uuid) -> Condition {
    Condition::all().add(account_products::Column::AccountUuid.eq(account_uuid))
}

impl<'a, C: ConnectionTrait> AccountProductRepository<'a, C> {
    /// Creates a new account product repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live link of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountProduct` NotExist if the link is missing.
    pub async fn get(&self, account_uuid: Uuid, uuid: Uuid) -> AppResult<account_products::Model> {
        crud::get::<account_products::Entity, _>(self.db, scope(account_uuid), uuid).await
    }

    /// Lists live links of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountProduct` NotExist if the page is empty.
    pub async fn list(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<account_products::Model>> {
        crud::list::<account_products::Entity, _>(self.db, scope(account_uuid), page).await
    }

    /// Links a product to the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountProduct` Exists if the product is already linked.
    pub async fn create(
        &self,
        account_uuid: Uuid,
        input: CreateAccountProductInput,
        actor: Uuid,
    ) -> AppResult<account_products::Model> {
        crud::ensure_absent::<account_products::Entity, _>(
            self.db,
            scope(account_uuid).add(account_products::Column::ProductUuid.eq(input.product_uuid)),
        )
        .await?;

        let model = account_products::ActiveModel {
            account_uuid: Set(account_uuid),
            product_uuid: Set(input.product_uuid),
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
    /// Returns `AccountProduct` NotExist if the link is missing.
    pub async fn update(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        input: UpdateAccountProductInput,
        actor: Uuid,
    ) -> AppResult<account_products::Model> {
        let patch = Assignments::<account_products::Entity>::new()
            .change(account_products::Column::StartOn, patch::value(input.start_on))
            .change(account_products::Column::EndOn, patch::value(input.end_on));

        crud::update(self.db, scope(account_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a link.
    ///
    /// # Errors
    ///
    /// Returns `AccountProduct` NotExist if the link is missing.
    pub async fn delete(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<account_products::Model> {
        crud::soft_delete::<account_products::Entity, _>(self.db, scope(account_uuid), uuid, actor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};

    const ACCOUNT: Uuid = Uuid::from_u128(0x10);
    const PRODUCT: Uuid = Uuid::from_u128(0x20);

    fn link() -> account_products::Model {
        account_products::Model {
            id: 1,
            uuid: Uuid::from_u128(0x30),
            account_uuid: ACCOUNT,
            product_uuid: PRODUCT,
            start_on: None,
            end_on: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn input() -> CreateAccountProductInput {
        CreateAccountProductInput {
            product_uuid: PRODUCT,
            start_on: None,
            end_on: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_link_fails_before_insert() {
        let db = mock()
            // first create: no duplicate, then the inserted row
            .append_query_results([Vec::<account_products::Model>::new()])
            .append_query_results([vec![link()]])
            // second create: the duplicate lookup finds the first row
            .append_query_results([vec![link()]])
            .into_connection();
        let repo = AccountProductRepository::new(&db);

        let created = repo.create(ACCOUNT, input(), ACTOR).await.unwrap();
        assert_eq!(created.uuid, Uuid::from_u128(0x30));

        let second = repo.create(ACCOUNT, input(), ACTOR).await;
        assert!(matches!(second, Err(AppError::Exists(Resource::AccountProduct))));

        let log = sql_log(db);
        assert_eq!(log.matches("INSERT INTO").count(), 1);
        assert!(log.contains(r#""acc_account_products"."product_uuid" = $"#));
    }

    #[tokio::test]
    async fn test_get_is_scoped_by_account() {
        let db = mock()
            .append_query_results([Vec::<account_products::Model>::new()])
            .into_connection();

        let result = AccountProductRepository::new(&db)
            .get(Uuid::from_u128(0x11), Uuid::from_u128(0x30))
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::AccountProduct))));
        assert!(sql_log(db).contains(r#""acc_account_products"."account_uuid" = $"#));
    }
}
