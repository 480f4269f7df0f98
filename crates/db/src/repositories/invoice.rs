//! Invoice repository. An order is billed by at most one live invoice.

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
    entities::invoices::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for invoicing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceInput {
    /// Billed order.
    pub order_uuid: Uuid,
    /// Status lookup value.
    pub sys_value_status_uuid: Option<Uuid>,
    /// Transaction date.
    pub transacted_on: Option<NaiveDate>,
    /// Posting date.
    pub posted_on: Option<NaiveDate>,
    /// Payment date.
    pub paid_on: Option<NaiveDate>,
}

/// Input for updating an invoice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoiceInput {
    /// Status lookup value.
    pub sys_value_status_uuid: Option<Uuid>,
    /// Transaction date.
    pub transacted_on: Option<NaiveDate>,
    /// Posting date.
    pub posted_on: Option<NaiveDate>,
    /// Payment date.
    pub paid_on: Option<NaiveDate>,
}

/// Invoice repository.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvoiceRepository<'a, C> {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live invoice.
    ///
    /// # Errors
    ///
    /// Returns `Invoice` NotExist if missing.
    pub async fn get(&self, uuid: Uuid) -> AppResult<invoices::Model> {
        crud::get::<invoices::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live invoices.
    ///
    /// # Errors
    ///
    /// Returns `Invoice` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<invoices::Model>> {
        crud::list::<invoices::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Invoices an order.
    ///
    /// # Errors
    ///
    /// Returns `Invoice` Exists if the order already has a live invoice.
    pub async fn create(&self, input: CreateInvoiceInput, actor: Uuid) -> AppResult<invoices::Model> {
        crud::ensure_absent::<invoices::Entity, _>(
            self.db,
            Condition::all().add(Column::OrderUuid.eq(input.order_uuid)),
        )
        .await?;

        let model = invoices::ActiveModel {
            order_uuid: Set(input.order_uuid),
            sys_value_status_uuid: Set(input.sys_value_status_uuid),
            transacted_on: Set(input.transacted_on),
            posted_on: Set(input.posted_on),
            paid_on: Set(input.paid_on),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an invoice.
    ///
    /// # Errors
    ///
    /// Returns `Invoice` NotExist if missing.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateInvoiceInput,
        actor: Uuid,
    ) -> AppResult<invoices::Model> {
        let patch = Assignments::<invoices::Entity>::new()
            .change(Column::SysValueStatusUuid, patch::value(input.sys_value_status_uuid))
            .change(Column::TransactedOn, patch::value(input.transacted_on))
            .change(Column::PostedOn, patch::value(input.posted_on))
            .change(Column::PaidOn, patch::value(input.paid_on));

        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes an invoice.
    ///
    /// # Errors
    ///
    /// Returns `Invoice` NotExist if missing.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<invoices::Model> {
        crud::soft_delete::<invoices::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, stamp};
    use crm_shared::{AppError, Resource};

    #[tokio::test]
    async fn test_order_is_invoiced_once() {
        let existing = invoices::Model {
            id: 1,
            uuid: Uuid::from_u128(0x61),
            order_uuid: Uuid::from_u128(0x90),
            sys_value_status_uuid: None,
            transacted_on: None,
            posted_on: None,
            paid_on: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        };
        let db = mock().append_query_results([vec![existing]]).into_connection();
        let input = CreateInvoiceInput {
            order_uuid: Uuid::from_u128(0x90),
            sys_value_status_uuid: None,
            transacted_on: None,
            posted_on: None,
            paid_on: None,
        };

        let result = InvoiceRepository::new(&db).create(input, ACTOR).await;
        assert!(matches!(result, Err(AppError::Exists(Resource::Invoice))));
    }
}
