//! Account contract repository.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppError, AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::account_contracts, operations, statement::Assignments};

/// Input for creating an account contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAccountContractInput {
    /// Stored contract document.
    pub document_metadata_uuid: Option<Uuid>,
    /// Contract type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// First day of the contract.
    pub start_on: Option<NaiveDate>,
    /// Last day of the contract.
    pub end_on: Option<NaiveDate>,
    /// Days of notice before the contract ends.
    pub notification_days: Option<i32>,
    /// Free-form status.
    pub status: Option<String>,
}

/// Input for updating an account contract. A blank `status` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountContractInput {
    /// Stored contract document.
    pub document_metadata_uuid: Option<Uuid>,
    /// Contract type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// First day of the contract.
    pub start_on: Option<NaiveDate>,
    /// Last day of the contract.
    pub end_on: Option<NaiveDate>,
    /// Days of notice before the contract ends.
    pub notification_days: Option<i32>,
    /// Free-form status.
    pub status: Option<String>,
}

/// Account contract repository, scoped by account.
#[derive(Debug, Clone, Copy)]
pub struct AccountContractRepository<'a, C> {
    db: &'a C,
}

fn scope(account_uuid: Uuid) -> Condition {
    Condition::all().add(account_contracts::Column::AccountUuid.eq(account_uuid))
}

fn notification_days(value: Option<i32>) -> AppResult<Option<i32>> {
    match value {
        Some(days) if days < 0 => Err(AppError::Validation(
            "notification_days must not be negative".to_string(),
        )),
        other => Ok(other),
    }
}

impl<'a, C: ConnectionTrait> AccountContractRepository<'a, C> {
    /// Creates a new account contract repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live contract of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountContract` NotExist if the contract is missing.
    pub async fn get(&self, account_uuid: Uuid, uuid: Uuid) -> AppResult<account_contracts::Model> {
        crud::get::<account_contracts::Entity, _>(self.db, scope(account_uuid), uuid).await
    }

    /// Lists live contracts of the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountContract` NotExist if the page is empty.
    pub async fn list(
        &self,
        account_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<account_contracts::Model>> {
        crud::list::<account_contracts::Entity, _>(self.db, scope(account_uuid), page).await
    }

    /// Creates a contract for the account.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `notification_days` is negative.
    pub async fn create(
        &self,
        account_uuid: Uuid,
        input: CreateAccountContractInput,
        actor: Uuid,
    ) -> AppResult<account_contracts::Model> {
        let model = account_contracts::ActiveModel {
            account_uuid: Set(account_uuid),
            document_metadata_uuid: Set(input.document_metadata_uuid),
            sys_value_type_uuid: Set(input.sys_value_type_uuid),
            start_on: Set(input.start_on),
            end_on: Set(input.end_on),
            notification_days: Set(notification_days(input.notification_days)?),
            status: Set(patch::optional_text(input.status)),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a contract.
    ///
    /// # Errors
    ///
    /// Returns `AccountContract` NotExist if the contract is missing.
    pub async fn update(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        input: UpdateAccountContractInput,
        actor: Uuid,
    ) -> AppResult<account_contracts::Model> {
        let patch = Assignments::<account_contracts::Entity>::new()
            .change(
                account_contracts::Column::DocumentMetadataUuid,
                patch::value(input.document_metadata_uuid),
            )
            .change(
                account_contracts::Column::SysValueTypeUuid,
                patch::value(input.sys_value_type_uuid),
            )
            .change(account_contracts::Column::StartOn, patch::value(input.start_on))
            .change(account_contracts::Column::EndOn, patch::value(input.end_on))
            .change(
                account_contracts::Column::NotificationDays,
                patch::value(notification_days(input.notification_days)?),
            )
            .change(account_contracts::Column::Status, patch::text(input.status));

        crud::update(self.db, scope(account_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a contract.
    ///
    /// # Errors
    ///
    /// Returns `AccountContract` NotExist if the contract is missing.
    pub async fn delete(
        &self,
        account_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<account_contracts::Model> {
        crud::soft_delete::<account_contracts::Entity, _>(self.db, scope(account_uuid), uuid, actor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log};

    #[tokio::test]
    async fn test_negative_notice_is_rejected() {
        let db = mock().into_connection();
        let input = CreateAccountContractInput {
            notification_days: Some(-1),
            ..Default::default()
        };

        let result = AccountContractRepository::new(&db)
            .create(Uuid::nil(), input, ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_status_clears_column() {
        let db = mock()
            .append_query_results([Vec::<account_contracts::Model>::new()])
            .into_connection();
        let input = UpdateAccountContractInput {
            status: Some(String::new()),
            ..Default::default()
        };

        let _ = AccountContractRepository::new(&db)
            .update(Uuid::nil(), Uuid::max(), input, ACTOR)
            .await;
        let log = sql_log(db);
        assert!(log.contains(r#""status" = $"#));
        assert!(log.contains("String(None)"));
    }
}
