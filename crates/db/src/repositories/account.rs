//! Account repository for customer accounts.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::accounts, operations, statement::Assignments};

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountInput {
    /// Account name.
    pub name: String,
    /// Status lookup value.
    pub sys_value_status_uuid: Option<Uuid>,
    /// First day the account is active.
    pub start_on: Option<NaiveDate>,
    /// Last day the account is active.
    pub end_on: Option<NaiveDate>,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountInput {
    /// Account name.
    pub name: Option<String>,
    /// Status lookup value.
    pub sys_value_status_uuid: Option<Uuid>,
    /// First day the account is active.
    pub start_on: Option<NaiveDate>,
    /// Last day the account is active.
    pub end_on: Option<NaiveDate>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct AccountRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AccountRepository<'a, C> {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live account.
    ///
    /// # Errors
    ///
    /// Returns `Account` NotExist if no live account has this uuid.
    pub async fn get(&self, uuid: Uuid) -> AppResult<accounts::Model> {
        crud::get::<accounts::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live accounts.
    ///
    /// # Errors
    ///
    /// Returns `Account` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<accounts::Model>> {
        crud::list::<accounts::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Fetches the live accounts with the given uuids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn get_many(&self, uuids: Vec<Uuid>) -> AppResult<Vec<accounts::Model>> {
        crud::get_many::<accounts::Entity, _>(self.db, uuids).await
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub async fn create(&self, input: CreateAccountInput, actor: Uuid) -> AppResult<accounts::Model> {
        let model = accounts::ActiveModel {
            name: Set(patch::required("name", input.name)?),
            sys_value_status_uuid: Set(input.sys_value_status_uuid),
            start_on: Set(input.start_on),
            end_on: Set(input.end_on),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns `Account` NotExist if no live account has this uuid.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateAccountInput,
        actor: Uuid,
    ) -> AppResult<accounts::Model> {
        let patch = Assignments::<accounts::Entity>::new()
            .change(accounts::Column::Name, patch::required_text("name", input.name)?)
            .change(
                accounts::Column::SysValueStatusUuid,
                patch::value(input.sys_value_status_uuid),
            )
            .change(accounts::Column::StartOn, patch::value(input.start_on))
            .change(accounts::Column::EndOn, patch::value(input.end_on));

        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `Account` NotExist if no live account has this uuid.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<accounts::Model> {
        crud::soft_delete::<accounts::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, count_row, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};

    fn account(id: i32, name: &str) -> accounts::Model {
        accounts::Model {
            id,
            uuid: Uuid::from_u128(u128::try_from(id).unwrap()),
            sys_value_status_uuid: None,
            name: name.to_string(),
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

    #[tokio::test]
    async fn test_list_counts_then_pages() {
        let db = mock()
            .append_query_results([vec![count_row(25)]])
            .append_query_results([vec![account(11, "Acme"), account(12, "Globex")]])
            .into_connection();

        let page = AccountRepository::new(&db)
            .list(PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert!(page.has_more);
        assert_eq!(page.items.len(), 2);

        let log = sql_log(db);
        assert!(log.contains("COUNT(*)"));
        assert!(log.contains("OFFSET"));
    }

    #[tokio::test]
    async fn test_empty_page_is_not_exist() {
        let db = mock()
            .append_query_results([vec![count_row(0)]])
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let result = AccountRepository::new(&db).list(PageRequest::default()).await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::Account))));
    }

    #[tokio::test]
    async fn test_create_stamps_actor() {
        let db = mock()
            .append_query_results([vec![account(1, "Acme")]])
            .into_connection();

        let created = AccountRepository::new(&db)
            .create(
                CreateAccountInput {
                    name: "  Acme ".to_string(),
                    sys_value_status_uuid: None,
                    start_on: None,
                    end_on: None,
                },
                ACTOR,
            )
            .await
            .unwrap();
        assert_eq!(created.name, "Acme");

        let log = sql_log(db);
        assert!(log.contains(r#"INSERT INTO "sales"."acc_accounts""#));
        assert!(log.contains("sys_created_by"));
        assert!(log.contains(r#"String(Some("Acme"))"#));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name_before_querying() {
        let db = mock().into_connection();
        let input = UpdateAccountInput {
            name: Some(" ".to_string()),
            ..Default::default()
        };

        let result = AccountRepository::new(&db).update(Uuid::nil(), input, ACTOR).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(sql_log(db), "[]");
    }

    #[tokio::test]
    async fn test_second_delete_is_not_exist() {
        let mut deleted = account(1, "Acme");
        deleted.sys_deleted_at = Some(stamp());
        let db = mock()
            .append_query_results([vec![deleted]])
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();
        let repo = AccountRepository::new(&db);

        assert!(repo.delete(Uuid::from_u128(1), ACTOR).await.is_ok());
        assert!(matches!(
            repo.delete(Uuid::from_u128(1), ACTOR).await,
            Err(AppError::NotExist(Resource::Account))
        ));
    }
}
