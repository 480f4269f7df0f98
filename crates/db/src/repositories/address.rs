//! Address repository.
//!
//! Addresses hang off either an entity or an account. The owner is recorded
//! as `parent_table` plus `parent_uuid`, and both columns scope every query.

use crm_core::{contact, patch};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::addresses::{self, Column},
    operations,
    statement::{Assignments, eq_nullable},
};

/// Owner of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressParent {
    /// Address of an entity.
    Entity(Uuid),
    /// Address of an account.
    Account(Uuid),
}

impl AddressParent {
    /// Value stored in `parent_table`.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Entity(_) => "entities",
            Self::Account(_) => "accounts",
        }
    }

    /// Value stored in `parent_uuid`.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Entity(uuid) | Self::Account(uuid) => uuid,
        }
    }

    fn scope(self) -> Condition {
        Condition::all()
            .add(Column::ParentTable.eq(self.table()))
            .add(Column::ParentUuid.eq(self.uuid()))
    }
}

/// Address fields, shared by create and update.
///
/// On update an omitted field is kept and a blank one is cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    /// Address type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// Street line.
    pub address_line1: Option<String>,
    /// Unit or suite line.
    pub address_line2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// County.
    pub county: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Five-digit ZIP code.
    pub zip: Option<String>,
    /// ZIP+4 suffix.
    pub zip_plus4: Option<String>,
}

fn zip_fields(zip: Option<&str>, zip_plus4: Option<&str>) -> AppResult<()> {
    if let Some(zip) = zip {
        contact::fixed_digits("zip", zip, 5)?;
    }
    if let Some(plus4) = zip_plus4 {
        contact::fixed_digits("zip_plus4", plus4, 4)?;
    }
    Ok(())
}

/// Address repository, scoped by owner.
#[derive(Debug, Clone, Copy)]
pub struct AddressRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AddressRepository<'a, C> {
    /// Creates a new address repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live address of the owner.
    ///
    /// # Errors
    ///
    /// Returns `Address` NotExist if the address is missing.
    pub async fn get(&self, parent: AddressParent, uuid: Uuid) -> AppResult<addresses::Model> {
        crud::get::<addresses::Entity, _>(self.db, parent.scope(), uuid).await
    }

    /// Lists live addresses of the owner.
    ///
    /// # Errors
    ///
    /// Returns `Address` NotExist if the page is empty.
    pub async fn list(
        &self,
        parent: AddressParent,
        page: PageRequest,
    ) -> AppResult<Page<addresses::Model>> {
        crud::list::<addresses::Entity, _>(self.db, parent.scope(), page).await
    }

    /// Creates an address for the owner.
    ///
    /// # Errors
    ///
    /// Returns `Address` Exists if the owner already has a live address with
    /// the same street lines and city, or a validation error for a malformed
    /// ZIP code.
    pub async fn create(
        &self,
        parent: AddressParent,
        input: AddressInput,
        actor: Uuid,
    ) -> AppResult<addresses::Model> {
        let address_line1 = patch::optional_text(input.address_line1);
        let address_line2 = patch::optional_text(input.address_line2);
        let city = patch::optional_text(input.city);
        let zip = patch::optional_text(input.zip);
        let zip_plus4 = patch::optional_text(input.zip_plus4);
        zip_fields(zip.as_deref(), zip_plus4.as_deref())?;

        crud::ensure_absent::<addresses::Entity, _>(
            self.db,
            Condition::all()
                .add(Column::ParentUuid.eq(parent.uuid()))
                .add(eq_nullable(Column::AddressLine1, address_line1.clone()))
                .add(eq_nullable(Column::AddressLine2, address_line2.clone()))
                .add(eq_nullable(Column::City, city.clone())),
        )
        .await?;

        let model = addresses::ActiveModel {
            parent_uuid: Set(parent.uuid()),
            parent_table: Set(parent.table().to_string()),
            sys_value_type_uuid: Set(input.sys_value_type_uuid),
            address_line1: Set(address_line1),
            address_line2: Set(address_line2),
            city: Set(city),
            county: Set(patch::optional_text(input.county)),
            state: Set(patch::optional_text(input.state)),
            country: Set(patch::optional_text(input.country)),
            zip: Set(zip),
            zip_plus4: Set(zip_plus4),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an address.
    ///
    /// # Errors
    ///
    /// Returns `Address` NotExist if the address is missing.
    pub async fn update(
        &self,
        parent: AddressParent,
        uuid: Uuid,
        input: AddressInput,
        actor: Uuid,
    ) -> AppResult<addresses::Model> {
        let zip = patch::text(input.zip);
        let zip_plus4 = patch::text(input.zip_plus4);
        zip_fields(
            zip.as_set().map(String::as_str),
            zip_plus4.as_set().map(String::as_str),
        )?;

        let patch = Assignments::<addresses::Entity>::new()
            .change(Column::SysValueTypeUuid, patch::value(input.sys_value_type_uuid))
            .change(Column::AddressLine1, patch::text(input.address_line1))
            .change(Column::AddressLine2, patch::text(input.address_line2))
            .change(Column::City, patch::text(input.city))
            .change(Column::County, patch::text(input.county))
            .change(Column::State, patch::text(input.state))
            .change(Column::Country, patch::text(input.country))
            .change(Column::Zip, zip)
            .change(Column::ZipPlus4, zip_plus4);

        crud::update(self.db, parent.scope(), uuid, patch, actor).await
    }

    /// Soft-deletes an address.
    ///
    /// # Errors
    ///
    /// Returns `Address` NotExist if the address is missing.
    pub async fn delete(
        &self,
        parent: AddressParent,
        uuid: Uuid,
        actor: Uuid,
    ) -> AppResult<addresses::Model> {
        crud::soft_delete::<addresses::Entity, _>(self.db, parent.scope(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::{AppError, Resource};

    const ENTITY: Uuid = Uuid::from_u128(0xE1);

    fn address(line2: Option<&str>) -> addresses::Model {
        addresses::Model {
            id: 7,
            uuid: Uuid::from_u128(0x70),
            parent_uuid: ENTITY,
            parent_table: "entities".to_string(),
            sys_value_type_uuid: None,
            address_line1: Some("1 Market St".to_string()),
            address_line2: line2.map(str::to_string),
            city: Some("San Francisco".to_string()),
            county: None,
            state: Some("CA".to_string()),
            country: Some("US".to_string()),
            zip: Some("94105".to_string()),
            zip_plus4: None,
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: Some(stamp()),
            sys_updated_by: Some(ACTOR),
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    #[tokio::test]
    async fn test_blank_line_two_is_stored_as_null() {
        let db = mock()
            .append_query_results([vec![address(None)]])
            .into_connection();
        let input = AddressInput {
            address_line2: Some(String::new()),
            ..Default::default()
        };

        let updated = AddressRepository::new(&db)
            .update(AddressParent::Entity(ENTITY), Uuid::from_u128(0x70), input, ACTOR)
            .await
            .unwrap();
        assert_eq!(updated.address_line2, None);

        let log = sql_log(db);
        assert!(log.contains(r#""address_line2" = $"#));
        assert!(!log.contains(r#""address_line1" = $"#));
        assert!(log.contains("String(None)"));
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_fields_untouched() {
        let db = mock()
            .append_query_results([vec![address(Some("Suite 4"))]])
            .into_connection();

        let updated = AddressRepository::new(&db)
            .update(
                AddressParent::Entity(ENTITY),
                Uuid::from_u128(0x70),
                AddressInput::default(),
                ACTOR,
            )
            .await
            .unwrap();
        assert_eq!(updated.address_line2.as_deref(), Some("Suite 4"));

        let log = sql_log(db);
        assert!(!log.contains(r#""address_line2" = $"#));
        assert!(log.contains(r#""sys_updated_by" = $"#));
    }

    #[tokio::test]
    async fn test_account_scope_uses_parent_table() {
        let db = mock()
            .append_query_results([Vec::<addresses::Model>::new()])
            .into_connection();

        let result = AddressRepository::new(&db)
            .get(AddressParent::Account(Uuid::from_u128(0xAC)), Uuid::nil())
            .await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::Address))));
        assert!(sql_log(db).contains(r#"String(Some("accounts"))"#));
    }

    #[tokio::test]
    async fn test_malformed_zip_is_rejected() {
        let db = mock().into_connection();
        let input = AddressInput {
            zip: Some("9410".to_string()),
            ..Default::default()
        };

        let result = AddressRepository::new(&db)
            .create(AddressParent::Entity(ENTITY), input, ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.starts_with("zip")));
    }

    #[tokio::test]
    async fn test_duplicate_lookup_matches_missing_lines_as_null() {
        let db = mock()
            .append_query_results([vec![address(None)]])
            .into_connection();
        let input = AddressInput {
            address_line1: Some("1 Market St".to_string()),
            city: Some("San Francisco".to_string()),
            ..Default::default()
        };

        let result = AddressRepository::new(&db)
            .create(AddressParent::Entity(ENTITY), input, ACTOR)
            .await;
        assert!(matches!(result, Err(AppError::Exists(Resource::Address))));
        assert!(sql_log(db).contains(r#""em_addresses"."address_line2" IS NULL"#));
    }
}
