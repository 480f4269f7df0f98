//! Catalog product repository.

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
    entities::products::{self, Column},
    operations,
    statement::{self, Assignments},
};

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Unique product name.
    pub name: String,
    /// Unique product code.
    pub code: Option<String>,
    /// Sale terms.
    pub terms: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the system may raise the price.
    #[serde(default)]
    pub sys_allowed_price_increase: bool,
    /// Whether the system may lower the price.
    #[serde(default)]
    pub sys_allowed_price_decrease: bool,
    /// Whether a user may raise the price.
    #[serde(default)]
    pub man_allowed_price_increase: bool,
    /// Whether a user may lower the price.
    #[serde(default)]
    pub man_allowed_price_decrease: bool,
}

/// Input for updating a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    /// Unique product name, never cleared.
    pub name: Option<String>,
    /// Unique product code.
    pub code: Option<String>,
    /// Sale terms.
    pub terms: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the system may raise the price.
    pub sys_allowed_price_increase: Option<bool>,
    /// Whether the system may lower the price.
    pub sys_allowed_price_decrease: Option<bool>,
    /// Whether a user may raise the price.
    pub man_allowed_price_increase: Option<bool>,
    /// Whether a user may lower the price.
    pub man_allowed_price_decrease: Option<bool>,
}

/// Catalog product repository.
#[derive(Debug, Clone, Copy)]
pub struct ProductRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProductRepository<'a, C> {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live product.
    ///
    /// # Errors
    ///
    /// Returns `Product` NotExist if missing.
    pub async fn get(&self, uuid: Uuid) -> AppResult<products::Model> {
        crud::get::<products::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live products.
    ///
    /// # Errors
    ///
    /// Returns `Product` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<products::Model>> {
        crud::list::<products::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Fetches the live products with the given uuids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn get_many(&self, uuids: Vec<Uuid>) -> AppResult<Vec<products::Model>> {
        crud::get_many::<products::Entity, _>(self.db, uuids).await
    }

    /// Finds a live product by name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<products::Model>> {
        operations::fetch_one(
            self.db,
            statement::select_matching::<products::Entity>(
                Condition::all().add(Column::Name.eq(name)),
            ),
        )
        .await
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns `Product` Exists if a live product has the same name or code.
    pub async fn create(&self, input: CreateProductInput, actor: Uuid) -> AppResult<products::Model> {
        let name = patch::required("name", input.name)?;
        let code = patch::optional_text(input.code);

        let mut key = Condition::any().add(Column::Name.eq(name.as_str()));
        if let Some(code) = &code {
            key = key.add(Column::Code.eq(code.as_str()));
        }
        crud::ensure_absent::<products::Entity, _>(self.db, key).await?;

        let model = products::ActiveModel {
            name: Set(name),
            code: Set(code),
            terms: Set(patch::optional_text(input.terms)),
            description: Set(patch::optional_text(input.description)),
            sys_allowed_price_increase: Set(input.sys_allowed_price_increase),
            sys_allowed_price_decrease: Set(input.sys_allowed_price_decrease),
            man_allowed_price_increase: Set(input.man_allowed_price_increase),
            man_allowed_price_decrease: Set(input.man_allowed_price_decrease),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a product.
    ///
    /// # Errors
    ///
    /// Returns `Product` NotExist if missing, or `Product` Exists if the new
    /// name or code is taken.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateProductInput,
        actor: Uuid,
    ) -> AppResult<products::Model> {
        let patch = Assignments::<products::Entity>::new()
            .change(Column::Name, patch::required_text("name", input.name)?)
            .change(Column::Code, patch::text(input.code))
            .change(Column::Terms, patch::text(input.terms))
            .change(Column::Description, patch::text(input.description))
            .change(
                Column::SysAllowedPriceIncrease,
                patch::value(input.sys_allowed_price_increase),
            )
            .change(
                Column::SysAllowedPriceDecrease,
                patch::value(input.sys_allowed_price_decrease),
            )
            .change(
                Column::ManAllowedPriceIncrease,
                patch::value(input.man_allowed_price_increase),
            )
            .change(
                Column::ManAllowedPriceDecrease,
                patch::value(input.man_allowed_price_decrease),
            );

        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes a product.
    ///
    /// # Errors
    ///
    /// Returns `Product` NotExist if missing.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<products::Model> {
        crud::soft_delete::<products::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log};

    #[tokio::test]
    async fn test_duplicate_lookup_matches_name_or_code() {
        let db = mock()
            .append_query_results([Vec::<products::Model>::new()])
            .append_query_results([Vec::<products::Model>::new()])
            .into_connection();
        let input: CreateProductInput =
            serde_json::from_str(r#"{"name": "Support", "code": "SUP-1"}"#).unwrap();

        let _ = ProductRepository::new(&db).create(input, ACTOR).await;
        let log = sql_log(db);
        assert!(log.contains(r#""pm_products"."name" = $"#));
        assert!(log.contains(" OR "));
        assert!(log.contains(r#""pm_products"."code" = $"#));
    }
}
