//! E-mail repository.
//!
//! Addresses are stored lowercased, with `username` and `domain` split at the
//! last `@`.

use crm_core::{contact, patch};
use crm_shared::{
    AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{crud, entities::emails, operations, statement::Assignments};

/// Input for adding an e-mail to an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmailInput {
    /// Raw address.
    pub email: String,
}

/// Input for changing an e-mail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmailInput {
    /// Raw address.
    pub email: Option<String>,
}

/// E-mail repository, scoped by entity.
#[derive(Debug, Clone, Copy)]
pub struct EmailRepository<'a, C> {
    db: &'a C,
}

fn scope(entity_uuid: Uuid) -> Condition {
    Condition::all().add(emails::Column::EntityUuid.eq(entity_uuid))
}

impl<'a, C: ConnectionTrait> EmailRepository<'a, C> {
    /// Creates a new e-mail repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live e-mail of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Email` NotExist if missing.
    pub async fn get(&self, entity_uuid: Uuid, uuid: Uuid) -> AppResult<emails::Model> {
        crud::get::<emails::Entity, _>(self.db, scope(entity_uuid), uuid).await
    }

    /// Lists live e-mails of the entity.
    ///
    /// # Errors
    ///
    /// Returns `Email` NotExist if the page is empty.
    pub async fn list(&self, entity_uuid: Uuid, page: PageRequest) -> AppResult<Page<emails::Model>> {
        crud::list::<emails::Entity, _>(self.db, scope(entity_uuid), page).await
    }

    /// Adds an e-mail to the entity.
    ///
    /// # Errors
    ///
    /// Returns `Email` Exists if the entity already has this address, or a
    /// validation error if it is not an e-mail.
    pub async fn create(
        &self,
        entity_uuid: Uuid,
        input: CreateEmailInput,
        actor: Uuid,
    ) -> AppResult<emails::Model> {
        let email = contact::normalize_email(&input.email)?;
        crud::ensure_absent::<emails::Entity, _>(
            self.db,
            scope(entity_uuid).add(emails::Column::Email.eq(email.email.as_str())),
        )
        .await?;

        let model = emails::ActiveModel {
            entity_uuid: Set(entity_uuid),
            email: Set(email.email),
            username: Set(Some(email.username)),
            domain: Set(Some(email.domain)),
            sys_created_by: Set(Some(actor)),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Replaces an e-mail address, re-splitting its parts.
    ///
    /// # Errors
    ///
    /// Returns `Email` NotExist if missing, or a validation error for a blank
    /// or malformed address.
    pub async fn update(
        &self,
        entity_uuid: Uuid,
        uuid: Uuid,
        input: UpdateEmailInput,
        actor: Uuid,
    ) -> AppResult<emails::Model> {
        let mut patch = Assignments::<emails::Entity>::new();
        if let Some(raw) = patch::required_text("email", input.email)?.as_set() {
            let email = contact::normalize_email(raw)?;
            patch = patch
                .change(emails::Column::Email, patch::Change::Set(email.email))
                .change(emails::Column::Username, patch::Change::Set(email.username))
                .change(emails::Column::Domain, patch::Change::Set(email.domain));
        }

        crud::update(self.db, scope(entity_uuid), uuid, patch, actor).await
    }

    /// Soft-deletes an e-mail.
    ///
    /// # Errors
    ///
    /// Returns `Email` NotExist if missing.
    pub async fn delete(&self, entity_uuid: Uuid, uuid: Uuid, actor: Uuid) -> AppResult<emails::Model> {
        crud::soft_delete::<emails::Entity, _>(self.db, scope(entity_uuid), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};

    const ENTITY: Uuid = Uuid::from_u128(0xE1);

    #[tokio::test]
    async fn test_create_stores_split_parts() {
        let stored = emails::Model {
            id: 3,
            uuid: Uuid::from_u128(0x33),
            entity_uuid: ENTITY,
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
            domain: Some("example.com".to_string()),
            sys_created_at: stamp(),
            sys_created_by: Some(ACTOR),
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        };
        let db = mock()
            .append_query_results([Vec::<emails::Model>::new()])
            .append_query_results([vec![stored]])
            .into_connection();

        let created = EmailRepository::new(&db)
            .create(
                ENTITY,
                CreateEmailInput {
                    email: " Ada@Example.com".to_string(),
                },
                ACTOR,
            )
            .await
            .unwrap();
        assert_eq!(created.domain.as_deref(), Some("example.com"));

        let log = sql_log(db);
        assert!(log.contains(r#"String(Some("ada@example.com"))"#));
        assert!(log.contains(r#"String(Some("ada"))"#));
    }

    #[tokio::test]
    async fn test_update_without_email_only_stamps() {
        let db = mock()
            .append_query_results([Vec::<emails::Model>::new()])
            .into_connection();

        let _ = EmailRepository::new(&db)
            .update(ENTITY, Uuid::nil(), UpdateEmailInput::default(), ACTOR)
            .await;
        let log = sql_log(db);
        assert!(!log.contains(r#""domain" = $"#));
        assert!(log.contains(r#""sys_updated_by" = $"#));
    }
}
