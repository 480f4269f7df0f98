//! Product list item repository, pricing products within a list.

use crm_core::{patch, pricing};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::product_list_items::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for pricing a product in a list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductListItemInput {
    /// Priced product.
    pub product_uuid: Uuid,
    /// List price.
    pub price: Decimal,
    /// Whether the system may raise the price.
    #[serde(default)]
    pub sys_allowed_price_increase: bool,
    /// Whether a user may raise the price.
    #[serde(default)]
    pub man_allowed_price_increase: bool,
    /// Whether the system may lower the price.
    #[serde(default)]
    pub sys_allowed_price_decrease: bool,
    /// Whether a user may lower the price.
    #[serde(default)]
    pub man_allowed_price_decrease: bool,
}

/// Input for updating a list item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductListItemInput {
    /// List price.
    pub price: Option<Decimal>,
    /// Whether the system may raise the price.
    pub sys_allowed_price_increase: Option<bool>,
    /// Whether a user may raise the price.
    pub man_allowed_price_increase: Option<bool>,
    /// Whether the system may lower the price.
    pub sys_allowed_price_decrease: Option<bool>,
    /// Whether a user may lower the price.
    pub man_allowed_price_decrease: Option<bool>,
}

/// Product list item repository, scoped by product list.
#[derive(Debug, Clone, Copy)]
pub struct ProductListItemRepository<'a, C> {
    db: &'a C,
}

fn scope(product_list_uuid: Uuid) -> Condition {
    Condition::all().add(Column::ProductListUuid.eq(product_list_uuid))
}

impl<'a, C: ConnectionTrait> ProductListItemRepository<'a, C> {
    /// Creates a new product list item repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live item of the list.
    ///
    /// # Errors
    ///
    /// Returns `ProductListItem` NotExist if missing.
    pub async fn get(
        &self,
        product_list_uuid: Uuid,
        uuid: Uuid,
    ) -> AppResult<product_list_items::Model> {
        crud::get::<product_list_items::Entity, _>(self.db, scope(product_list_uuid), uuid).await
    }

    /// Lists live items of the list.
    ///
    /// # Errors
    ///
    /// Returns `ProductListItem` NotExist if the page is empty.
    pub async fn list(
        &self,
        product_list_uuid: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<product_list_items::Model>> {
        crud::list::<product_list_items::Entity, _>(self.db, scope(product_list_uuid), page).await
    }

    /// Prices a product in the list.
    ///
    /// # Errors
    ///
    /// Returns `ProductListItem` Exists if the product is already priced in
    /// this list, or a validation error for a negative price.
    pub async fn create(
        &self,
        product_list_uuid: Uuid,
        input: CreateProductListItemInput,
        actor: Uuid,
    ) -> AppResult<product_list_items::Model> {
        let price = pricing::list_price("price", input.price)?;
        crud::ensure_absent::<product_list_items::Entity, _>(
            self.db,
            scope(product_list_uuid).add(Column::ProductUuid.eq(input.product_uuid)),
        )
        .await?;

        let model = product_list_items::ActiveModel {
            product_list_uuid: Set(product_list_uuid),
            product_uuid: Set(input.product_uuid),
            price: Set(price),
            sys_allowed_price_increase: Set(input.sys_allowed_price_increase),
            man_allowed_price_increase: Set(input.man_allowed_price_increase),
            sys_allowed_price_decrease: Set(input.sys_allowed_price_decrease),
            man_allowed_price_decrease: Set(input.man_allowed_price_decrease),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a list item.
    ///
    /// # Errors
    ///
    /// Returns `ProductListItem` NotExist if missing.
    pub async fn update(
        &self,
        product_list_uuid: Uuid,
        uuid: Uuid,
        input: UpdateProductListItemInput,
        actor: Uuid,
    ) -> AppResult<product_list_items::Model> {
        let price = input
            .price
            .map(|price| pricing::list_price("price", price))
            .transpose()?;
        let patch = Assignments::<product_list_items::Entity>::new()
            .change(Column::Price, patch::value(price))
            .change(
                Column::SysAllowedPriceIncrease,
                patch::value(input.sys_allowed_price_increase),
            )
            .change(
                Column::ManAllowedPriceIncrease,
                patch::value(input.man_allowed_price_increase),
            )
            .change(
                Column::SysAllowedPriceDecrease,
                patch::value(input.sys_allowed_price_decrease),
            )
            .change(
                Column::ManAllowedPriceDecrease,
                patch::value(input.man_allowed_price_decrease),
            );

        crud::update(self.db, scope(product_list_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a list item.
    ///
    /// # Errors
    ///
    /// Returns `ProductListItem` NotExist if missing.
    pub async fn delete(
        &self,
        product_list_uuid: Uuid,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<product_list_items::Model> {
        crud::soft_delete::<product_list_items::Entity, _>(
            self.db,
            scope(product_list_uuid),
            uuid,
            actor,
        )
        .await
    }
}
