//! Product list repository.

use chrono::NaiveDate;
use crm_core::patch;
use crm_shared::{
    AppError, AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::product_lists::{self, Column},
    operations,
    statement::Assignments,
};

/// Input for creating a product list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductListInput {
    /// Sys user owning the list.
    pub owner_uuid: Option<Uuid>,
    /// Unique list name.
    pub name: String,
    /// First day the prices apply.
    pub start_on: NaiveDate,
    /// Last day the prices apply.
    pub end_on: NaiveDate,
}

/// Input for updating a product list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductListInput {
    /// Sys user owning the list.
    pub owner_uuid: Option<Uuid>,
    /// Unique list name, never cleared.
    pub name: Option<String>,
    /// First day the prices apply.
    pub start_on: Option<NaiveDate>,
    /// Last day the prices apply.
    pub end_on: Option<NaiveDate>,
}

fn window(start_on: NaiveDate, end_on: NaiveDate) -> AppResult<()> {
    if start_on <= end_on {
        Ok(())
    } else {
        Err(AppError::Validation(
            "end_on must not be before start_on".to_string(),
        ))
    }
}

/// Product list repository.
#[derive(Debug, Clone, Copy)]
pub struct ProductListRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProductListRepository<'a, C> {
    /// Creates a new product list repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live product list.
    ///
    /// # Errors
    ///
    /// Returns `ProductList` NotExist if missing.
    pub async fn get(&self, uuid: Uuid) -> AppResult<product_lists::Model> {
        crud::get::<product_lists::Entity, _>(self.db, Condition::all(), uuid).await
    }

    /// Lists live product lists.
    ///
    /// # Errors
    ///
    /// Returns `ProductList` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<product_lists::Model>> {
        crud::list::<product_lists::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Fetches the live product lists with the given uuids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn get_many(&self, uuids: Vec<Uuid>) -> AppResult<Vec<product_lists::Model>> {
        crud::get_many::<product_lists::Entity, _>(self.db, uuids).await
    }

    /// Creates a product list.
    ///
    /// # Errors
    ///
    /// Returns `ProductList` Exists if the name is taken, or a validation error
    /// if the window ends before it starts.
    pub async fn create(
        &self,
        input: CreateProductListInput,
        actor: Uuid,
    ) -> AppResult<product_lists::Model> {
        let name = patch::required("name", input.name)?;
        window(input.start_on, input.end_on)?;
        crud::ensure_absent::<product_lists::Entity, _>(
            self.db,
            Condition::all().add(Column::Name.eq(name.as_str())),
        )
        .await?;

        let model = product_lists::ActiveModel {
            owner_uuid: Set(input.owner_uuid),
            name: Set(name),
            start_on: Set(input.start_on),
            end_on: Set(input.end_on),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a product list.
    ///
    /// # Errors
    ///
    /// Returns `ProductList` NotExist if missing, or a validation error if
    /// the patched window would end before it starts.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateProductListInput,
        actor: Uuid,
    ) -> AppResult<product_lists::Model> {
        // a one-sided patch is checked against the stored other end
        match (input.start_on, input.end_on) {
            (Some(start_on), Some(end_on)) => window(start_on, end_on)?,
            (Some(start_on), None) => window(start_on, self.get(uuid).await?.end_on)?,
            (None, Some(end_on)) => window(self.get(uuid).await?.start_on, end_on)?,
            (None, None) => {}
        }
        let patch = Assignments::<product_lists::Entity>::new()
            .change(Column::OwnerUuid, patch::value(input.owner_uuid))
            .change(Column::Name, patch::required_text("name", input.name)?)
            .change(Column::StartOn, patch::value(input.start_on))
            .change(Column::EndOn, patch::value(input.end_on));

        crud::update(self.db, Condition::all(), uuid, patch, actor).await
    }

    /// Soft-deletes a product list.
    ///
    /// # Errors
    ///
    /// Returns `ProductList` NotExist if missing.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<product_lists::Model> {
        crud::soft_delete::<product_lists::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn list_2026() -> product_lists::Model {
        product_lists::Model {
            id: 1,
            uuid: Uuid::from_u128(0x71),
            owner_uuid: None,
            name: "Standard 2026".to_string(),
            start_on: date(2026, 1, 1),
            end_on: date(2026, 12, 31),
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    #[tokio::test]
    async fn test_inverted_window_is_rejected() {
        let db = mock().into_connection();
        let input = CreateProductListInput {
            owner_uuid: None,
            name: "2026 list".to_string(),
            start_on: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            end_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };

        let result = ProductListRepository::new(&db).create(input, ACTOR).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_end_on_alone_before_stored_start_is_rejected() {
        let db = mock()
            .append_query_results([vec![list_2026()]])
            .into_connection();
        let input = UpdateProductListInput {
            end_on: Some(date(2020, 1, 1)),
            ..Default::default()
        };

        let result = ProductListRepository::new(&db)
            .update(Uuid::from_u128(0x71), input, ACTOR)
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("end_on")));
        assert!(!sql_log(db).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_start_on_alone_within_stored_end_is_applied() {
        let mut moved = list_2026();
        moved.start_on = date(2026, 6, 1);
        let db = mock()
            .append_query_results([vec![list_2026()], vec![moved]])
            .into_connection();
        let input = UpdateProductListInput {
            start_on: Some(date(2026, 6, 1)),
            ..Default::default()
        };

        let updated = ProductListRepository::new(&db)
            .update(Uuid::from_u128(0x71), input, ACTOR)
            .await
            .unwrap();

        assert_eq!(updated.start_on, date(2026, 6, 1));
        assert!(sql_log(db).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_one_sided_patch_on_missing_list() {
        let db = mock()
            .append_query_results([Vec::<product_lists::Model>::new()])
            .into_connection();
        let input = UpdateProductListInput {
            end_on: Some(date(2027, 1, 1)),
            ..Default::default()
        };

        let result = ProductListRepository::new(&db)
            .update(Uuid::from_u128(0x71), input, ACTOR)
            .await;

        assert!(matches!(
            result,
            Err(AppError::NotExist(crm_shared::Resource::ProductList))
        ));
    }
}
