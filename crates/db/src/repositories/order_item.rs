//! Sales order item repository.

use crm_core::{patch, pricing::AdjustmentType};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use super::line_item::{LinePrice, LinePriceChange};
use crate::{
    crud,
    entities::order_items::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for adding an item to an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderItemInput {
    /// Priced catalog entry.
    pub product_list_item_uuid: Uuid,
    /// Sys user owning the item.
    pub owner_uuid: Option<Uuid>,
    /// Sys user who adjusted the price.
    pub adjusted_by_uuid: Option<Uuid>,
    /// List price.
    pub original_price: Decimal,
    /// How the adjustment applies.
    pub adjustment_type: Option<AdjustmentType>,
    /// Adjustment amount.
    pub price_adjustment: Option<Decimal>,
}

/// Input for updating an order item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderItemInput {
    /// Sys user owning the item.
    pub owner_uuid: Option<Uuid>,
    /// Sys user who adjusted the price.
    pub adjusted_by_uuid: Option<Uuid>,
    /// List price.
    pub original_price: Option<Decimal>,
    /// How the adjustment applies.
    pub adjustment_type: Option<AdjustmentType>,
    /// Adjustment amount.
    pub price_adjustment: Option<Decimal>,
}

/// Order item repository, scoped by order.
#[derive(Debug, Clone, Copy)]
pub struct OrderItemRepository<'a, C> {
    db: &'a C,
}

fn scope(order_uuid: Uuid) -> Condition {
    Condition::all().add(Column::OrderUuid.eq(order_uuid))
}

impl<'a, C: ConnectionTrait> OrderItemRepository<'a, C> {
    /// Creates a new order item repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live item of the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderItem` NotExist if missing.
    pub async fn get(&self, order_uuid: Uuid, uuid: Uuid) -> AppResult<order_items::Model> {
        crud::get::<order_items::Entity, _>(self.db, scope(order_uuid), uuid).await
    }

    /// Lists live items of the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderItem` NotExist if the page is empty.
    pub async fn list(
        &self,
        order_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<order_items::Model>> {
        crud::list::<order_items::Entity, _>(self.db, scope(order_uuid), page).await
    }

    /// Adds an item to the order.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a price is not positive once truncated
    /// to cents.
    pub async fn create(
        &self,
        order_uuid: Uuid,
        input: CreateOrderItemInput,
        actor: Uuid,
    ) -> AppResult<order_items::Model> {
        let price = LinePrice::new(
            input.original_price,
            input.adjustment_type,
            input.price_adjustment,
        )?;

        let model = order_items::ActiveModel {
            order_uuid: Set(order_uuid),
            product_list_item_uuid: Set(input.product_list_item_uuid),
            owner_uuid: Set(input.owner_uuid),
            adjusted_by_uuid: Set(input.adjusted_by_uuid),
            original_price: Set(price.original_price),
            adjustment_type: Set(price.adjustment_type),
            price_adjustment: Set(price.price_adjustment),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an order item.
    ///
    /// # Errors
    ///
    /// Returns `OrderItem` NotExist if missing.
    pub async fn update(
        &self,
        order_uuid: Uuid,
        uuid: Uuid,
        input: UpdateOrderItemInput,
        actor: Uuid,
    ) -> AppResult<order_items::Model> {
        let price = LinePriceChange::new(
            input.original_price,
            input.adjustment_type,
            input.price_adjustment,
        )?;
        let patch = Assignments::<order_items::Entity>::new()
            .change(Column::OwnerUuid, patch::value(input.owner_uuid))
            .change(Column::AdjustedByUuid, patch::value(input.adjusted_by_uuid))
            .change(Column::OriginalPrice, price.original_price)
            .change(Column::AdjustmentType, price.adjustment_type)
            .change(Column::PriceAdjustment, price.price_adjustment);

        crud::update(self.db, scope(order_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes an order item.
    ///
    /// # Errors
    ///
    /// Returns `OrderItem` NotExist if missing.
    pub async fn delete(
        &self,
        order_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<order_items::Model> {
        crud::soft_delete::<order_items::Entity, _>(self.db, scope(order_uuid), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_stores_truncated_prices() {
        let stored = order_items::Model {
            id: 1,
            uuid: Uuid::from_u128(0x91),
            order_uuid: Uuid::from_u128(0x90),
            product_list_item_uuid: Uuid::from_u128(0x80),
            owner_uuid: None,
            adjusted_by_uuid: None,
            original_price: dec!(10.99),
            adjustment_type: Some("dollar".to_string()),
            price_adjustment: Some(dec!(1.50)),
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        };
        let db = mock().append_query_results([vec![stored]]).into_connection();

        let input = CreateOrderItemInput {
            product_list_item_uuid: Uuid::from_u128(0x80),
            owner_uuid: None,
            adjusted_by_uuid: None,
            original_price: dec!(10.999),
            adjustment_type: Some(AdjustmentType::Dollar),
            price_adjustment: Some(dec!(1.509)),
        };
        OrderItemRepository::new(&db)
            .create(Uuid::from_u128(0x90), input, ACTOR)
            .await
            .unwrap();

        let log = sql_log(db);
        assert!(log.contains("Decimal(Some(10.99))"));
        assert!(log.contains("Decimal(Some(1.50))"));
    }
}
