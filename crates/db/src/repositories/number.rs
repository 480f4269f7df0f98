//! Phone number repository.

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
    entities::numbers::{self, Column},
    operations,
    statement::{Assignments, eq_nullable},
};

/// Input for adding a phone number to an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNumberInput {
    /// Number type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// Country calling code, up to three digits.
    pub country_code: Option<String>,
    /// Three-digit area code.
    pub area_code: String,
    /// Four-digit line number.
    pub line_number: String,
    /// Extension, up to six digits.
    pub extension: Option<String>,
}

/// Input for updating a phone number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNumberInput {
    /// Number type lookup value.
    pub sys_value_type_uuid: Option<Uuid>,
    /// Country calling code. A blank value clears it.
    pub country_code: Option<String>,
    /// Area code, never cleared.
    pub area_code: Option<String>,
    /// Line number, never cleared.
    pub line_number: Option<String>,
    /// Extension. A blank value clears it.
    pub extension: Option<String>,
}

struct Digits<'s> {
    country_code: Option<&'s str>,
    area_code: Option<&'s str>,
    line_number: Option<&'s str>,
    extension: Option<&'s str>,
}

impl Digits<'_> {
    fn check(&self) -> AppResult<()> {
        if let Some(code) = self.country_code {
            contact::max_digits("country_code", code, 3)?;
        }
        if let Some(area) = self.area_code {
            contact::fixed_digits("area_code", area, 3)?;
        }
        if let Some(line) = self.line_number {
            contact::fixed_digits("line_number", line, 4)?;
        }
        if let Some(extension) = self.extension {
            contact::max_digits("extension", extension, 6)?;
        }
        Ok(())
    }
}

/// Phone number repository, scoped by entity.
#[derive(Debug, Clone, Copy)]
pub struct NumberRepository<'a, C> {
    db: &'a C,
}

fn scope(entity_uuid: Uuid) -> Condition {
    Condition::all().add(Column::EntityUuid.eq(entity_uuid))
}

impl<'a, C: ConnectionTrait> NumberRepository<'a, C> {
    /// Creates a new phone number repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live number of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Number` NotExist if missing.
    pub async fn get(&self, entity_uuid: Uuid, uuid: Uuid) -> AppResult<numbers::Model> {
        crud::get::<numbers::Entity, _>(self.db, scope(entity_uuid), uuid).await
    }

    /// Lists live numbers of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Number` NotExist if the page is empty.
    pub async fn list(&self, entity_uuid: Uuid, page: PageRequest) -> AppResult<Page<numbers::Model>> {
        crud::list::<numbers::Entity, _>(self.db, scope(entity_uuid), page).await
    }

    /// Adds a number to the entity.
    ///
    /// # Errors
    ///
    /// Returns `Number` Exists if the entity already has this number, or a
    /// validation error for a malformed part.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        input: CreateNumberInput,
        actor: Uuid,
    ) -> AppResult<numbers::Model> {
        let country_code = patch::optional_text(input.country_code);
        let area_code = patch::required("area_code", input.area_code)?;
        let line_number = patch::required("line_number", input.line_number)?;
        let extension = patch::optional_text(input.extension);
        Digits {
            country_code: country_code.as_deref(),
            area_code: Some(&area_code),
            line_number: Some(&line_number),
            extension: extension.as_deref(),
        }
        .check()?;

        crud::ensure_absent::<numbers::Entity, _>(
            self.db,
            scope(entity_uuid)
                .add(eq_nullable(Column::CountryCode, country_code.clone()))
                .add(Column::AreaCode.eq(area_code.as_str()))
                .add(Column::LineNumber.eq(line_number.as_str()))
                .add(eq_nullable(Column::Extension, extension.clone())),
        )
        .await?;

        let model = numbers::ActiveModel {
            entity_uuid: Set(entity_uuid),
            sys_value_type_uuid: Set(input.sys_value_type_uuid),
            country_code: Set(country_code),
            area_code: Set(area_code),
            line_number: Set(line_number),
            extension: Set(extension),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates a number.
    ///
    /// # Errors
    ///
    /// Returns `Number` NotExist if missing, or a validation error for a
    /// malformed part.
    pub async fn update(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        input: UpdateNumberInput,
        actor: Uuid,
    ) -> AppResult<numbers::Model> {
        let country_code = patch::text(input.country_code);
        let area_code = patch::required_text("area_code", input.area_code)?;
        let line_number = patch::required_text("line_number", input.line_number)?;
        let extension = patch::text(input.extension);
        Digits {
            country_code: country_code.as_set().map(String::as_str),
            area_code: area_code.as_set().map(String::as_str),
            line_number: line_number.as_set().map(String::as_str),
            extension: extension.as_set().map(String::as_str),
        }
        .check()?;

        let patch = Assignments::<numbers::Entity>::new()
            .change(Column::SysValueTypeUuid, patch::value(input.sys_value_type_uuid))
            .change(Column::CountryCode, country_code)
            .change(Column::AreaCode, area_code)
            .change(Column::LineNumber, line_number)
            .change(Column::Extension, extension);

        crud::update(self.db, scope(entity_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes a number.
    ///
    /// # Errors
    ///
    /// Returns `Number` NotExist if missing.
    pub async fn delete(&self, entity_uuid: Uuid, uuid: Uuid, actor: Uuid) -> AppResult<numbers::Model> {
        crud::soft_delete::<numbers::Entity, _>(self.db, scope(entity_uuid), uuid, actor).await
    }
}
