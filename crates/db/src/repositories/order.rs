//! Sales order repository.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::orders::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for creating a sales order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    /// Ordering account.
    pub account_uuid: Uuid,
    /// Invoice billed for the order.
    pub invoice_uuid: Option<Uuid>,
    /// Sys user owning the order.
    pub owner_uuid: Option<Uuid>,
    /// Sys user who approved the order.
    pub approved_by_uuid: Option<Uuid>,
    /// Approval date.
    pub approved_on: Option<NaiveDate>,
    /// Transaction date.
    pub transacted_on: Option<NaiveDate>,
}

/// Input for updating a sales order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderInput {
    /// Invoice billed for the order.
    pub invoice_uuid: Option<Uuid>,
    /// Sys user owning the order.
    pub owner_uuid: Option<Uuid>,
    /// Sys user who approved the order.
    pub approved_by_uuid: Option<Uuid>,
    /// Approval date.
    pub approved_on: Option<NaiveDate>,
    /// Transaction date.
    pub transacted_on: Option<NaiveDate>,
}

/// Sales order repository.
#[derive(Debug, Clone, Copy)]
pub struct OrderRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OrderRepository<'a, C> {
    /// Creates a new sales order repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live order.
    ///
    /// # Errors
    ///
    /// Returns `Order` NotExist if missing.
    pub async fn get(&self, uuid: Uuid) -> AppResult<orders::Model> {
        crud::get::<orders::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live orders.
    ///
    /// # Errors
    ///
    /// Returns `Order` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<orders::Model>> {
        crud::list::<orders::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Creates an order.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the account does not exist.
    pub async fn create(&self, input: CreateOrderInput, actor: Uuid) -> AppResult<orders::Model> {
        let model = orders::ActiveModel {
            account_uuid: Set(input.account_uuid),
            invoice_uuid: Set(input.invoice_uuid),
            owner_uuid: Set(input.owner_uuid),
            approved_by_uuid: Set(input.approved_by_uuid),
            approved_on: Set(input.approved_on),
            transacted_on: Set(input.transacted_on),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an order.
    ///
    /// # Errors
    ///
    /// Returns `Order` NotExist if missing.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateOrderInput,
        actor: Uuid,
    ) -> AppResult<orders::Model> {
        let patch = Assignments::<orders::Entity>::new()
            .change(Column::InvoiceUuid, patch::value(input.invoice_uuid))
            .change(Column::OwnerUuid, patch::value(input.owner_uuid))
            .change(Column::ApprovedByUuid, patch::value(input.approved_by_uuid))
            .change(Column::ApprovedOn, patch::value(input.approved_on))
            .change(Column::TransactedOn, patch::value(input.transacted_on));

        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes an order. Its items are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `Order` NotExist if missing.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<orders::Model> {
        crud::soft_delete::<orders::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}
