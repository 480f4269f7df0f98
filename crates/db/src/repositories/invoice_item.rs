//! Invoice item repository.

use crm_core::{patch, pricing::AdjustmentType};
use crm_shared::{
    AppError, AppResult,
    types::{Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use super::line_item::{LinePrice, LinePriceChange};
use crate::{
    crud,
    entities::invoice_items::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for adding an item to an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceItemInput {
    /// Order item being billed.
    pub order_item_uuid: Option<Uuid>,
    /// Priced catalog entry.
    pub product_list_item_uuid: Uuid,
    /// Billed quantity.
    pub quantity: i32,
    /// Sys user owning the item.
    pub owner_uuid: Option<Uuid>,
    /// List price.
    pub original_price: Decimal,
    /// How the adjustment applies.
    pub adjustment_type: Option<AdjustmentType>,
    /// Adjustment amount.
    pub price_adjustment: Option<Decimal>,
}

/// Input for updating an invoice item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoiceItemInput {
    /// Billed quantity.
    pub quantity: Option<i32>,
    /// Sys user owning the item.
    pub owner_uuid: Option<Uuid>,
    /// List price.
    pub original_price: Option<Decimal>,
    /// How the adjustment applies.
    pub adjustment_type: Option<AdjustmentType>,
    /// Adjustment amount.
    pub price_adjustment: Option<Decimal>,
}

fn quantity(value: i32) -> AppResult<i32> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ))
    }
}

/// Invoice item repository, scoped by invoice.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceItemRepository<'a, C> {
    db: &'a C,
}

fn scope(invoice_uuid: Uuid) -> Condition {
    Condition::all().add(Column::InvoiceUuid.eq(invoice_uuid))
}

impl<'a, C: ConnectionTrait> InvoiceItemRepository<'a, C> {
    /// Creates a new invoice item repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live item of the invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItem` NotExist if missing.
    pub async fn get(&self, invoice_uuid: Uuid, uuid: Uuid) -> AppResult<invoice_items::Model> {
        crud::get::<invoice_items::Entity, _>(self.db, scope(invoice_uuid), uuid).await
    }

    /// Lists live items of the invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItem` NotExist if the page is empty.
    pub async fn list(
        &self,
        invoice_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<invoice_items::Model>> {
        crud::list::<invoice_items::Entity, _>(self.db, scope(invoice_uuid), page).await
    }

    /// Adds an item to the invoice.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a quantity below one or a price that is
    /// not positive once truncated to cents.
    pub async fn create(
        &self,
        invoice_uuid: Uuid,
        input: CreateInvoiceItemInput,
        actor: Uuid,
    ) -> AppResult<invoice_items::Model> {
        let price = LinePrice::new(
            input.original_price,
            input.adjustment_type,
            input.price_adjustment,
        )?;

        let model = invoice_items::ActiveModel {
            invoice_uuid: Set(invoice_uuid),
            order_item_uuid: Set(input.order_item_uuid),
            product_list_item_uuid: Set(input.product_list_item_uuid),
            quantity: Set(quantity(input.quantity)?),
            owner_uuid: Set(input.owner_uuid),
            original_price: Set(price.original_price),
            adjustment_type: Set(price.adjustment_type),
            price_adjustment: Set(price.price_adjustment),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an invoice item.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItem` NotExist if missing.
    pub async fn update(
        &self,
        invoice_uuid: Uuid,
        uuid: Uuid,
        input: UpdateInvoiceItemInput,
        actor: Uuid,
    ) -> AppResult<invoice_items::Model> {
        let price = LinePriceChange::new(
            input.original_price,
            input.adjustment_type,
            input.price_adjustment,
        )?;
        let patch = Assignments::<invoice_items::Entity>::new()
            .change(
                Column::Quantity,
                patch::value(input.quantity.map(quantity).transpose()?),
            )
            .change(Column::OwnerUuid, patch::value(input.owner_uuid))
            .change(Column::OriginalPrice, price.original_price)
            .change(Column::AdjustmentType, price.adjustment_type)
            .change(Column::PriceAdjustment, price.price_adjustment);

        crud::update(self.db, scope(invoice_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes an invoice item.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceItem` NotExist if missing.
    pub async fn delete(
        &self,
        invoice_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<invoice_items::Model> {
        crud::soft_delete::<invoice_items::Entity, _>(self.db, scope(invoice_uuid), uuid, actor)
            .await
    }
}
