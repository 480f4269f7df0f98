//! Sys user repository for operator accounts.
//!
//! Disabling a user is distinct from deleting one. Reads, updates, and the
//! credential lookup skip disabled users, so a disabled user is reported the
//! same way as a missing one. Listing shows disabled users as well.

use chrono::Utc;
use crm_core::{
    auth::{hash_password, normalize_credential, validate_password},
    contact,
    patch::{self, Change},
};
use crm_shared::{
    AppError, AppResult,
    types::{Page, PageRequest},
};
use sea_orm::{ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    crud,
    entities::sys_users::{self, Column},
    operations,
    statement::{self, Assignments},
};

/// Public sign-up payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact address, stored lowercased.
    pub email: String,
    /// Login name, stored lowercased.
    pub username: String,
    /// Plaintext password, checked against the policy then hashed.
    pub password: String,
}

/// Input for updating a sys user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSysUserInput {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
    /// Login name.
    pub username: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

fn enabled() -> Condition {
    Condition::all().add(Column::DisabledAt.is_null())
}

fn hashed(password: &str) -> AppResult<String> {
    validate_password(password)?;
    hash_password(password).map_err(|e| AppError::Internal(e.to_string()))
}

fn credential(field: &str, value: String) -> AppResult<String> {
    patch::required(field, value).map(|v| normalize_credential(&v))
}

/// Sys user repository.
#[derive(Debug, Clone, Copy)]
pub struct SysUserRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SysUserRepository<'a, C> {
    /// Creates a new sys user repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a live, enabled user.
    ///
    /// # Errors
    ///
    /// Returns `SysUser` NotExist if missing or disabled.
    pub async fn get(&self, uuid: Uuid) -> AppResult<sys_users::Model> {
        crud::get::<sys_users::Entity, _>(self.db, enabled(), uuid).await
    }

    /// Lists live users, disabled ones included.
    ///
    /// # Errors
    ///
    /// Returns `SysUser` NotExist if the page is empty.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<sys_users::Model>> {
        crud::list::<sys_users::Entity, _>(self.db, Condition::all(), page).await
    }

    /// Finds a live, enabled user by login name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failure.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<sys_users::Model>> {
        let query = statement::select_matching::<sys_users::Entity>(
            enabled().add(Column::Username.eq(normalize_credential(username))),
        );
        operations::fetch_one(self.db, query).await
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// - `SysUser` Exists if the e-mail or username is taken.
    /// - A validation error if the password breaks the policy or the e-mail
    ///   is malformed.
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<sys_users::Model> {
        let email = contact::normalize_email(&input.email)?.email;
        let username = credential("username", input.username)?;
        let password = hashed(&input.password)?;

        crud::ensure_absent::<sys_users::Entity, _>(
            self.db,
            Condition::any()
                .add(Column::Email.eq(email.as_str()))
                .add(Column::Username.eq(username.as_str())),
        )
        .await?;

        let model = sys_users::ActiveModel {
            first_name: Set(patch::required("first_name", input.first_name)?),
            last_name: Set(patch::required("last_name", input.last_name)?),
            email: Set(email),
            username: Set(username),
            password: Set(password),
            ..Default::default()
        };
        operations::insert_one(self.db, model).await
    }

    /// Updates an enabled user. A new password is re-hashed.
    ///
    /// # Errors
    ///
    /// Returns `SysUser` NotExist if missing or disabled, or `SysUser` Exists
    /// if the new e-mail or username is taken.
    pub async fn update(
        &self,
        uuid: Uuid,
        input: UpdateSysUserInput,
        actor: Uuid,
    ) -> AppResult<sys_users::Model> {
        let email = patch::required_text("email", input.email)?
            .try_map(|raw| contact::normalize_email(&raw).map(|e| e.email))?;
        let username =
            patch::required_text("username", input.username)?.map(|u| normalize_credential(&u));
        let password = match input.password {
            Some(password) => Change::Set(hashed(&password)?),
            None => Change::Keep,
        };

        let patch = Assignments::<sys_users::Entity>::new()
            .change(
                Column::FirstName,
                patch::required_text("first_name", input.first_name)?,
            )
            .change(
                Column::LastName,
                patch::required_text("last_name", input.last_name)?,
            )
            .change(Column::Email, email)
            .change(Column::Username, username)
            .change(Column::Password, password);

        crud::update(self.db, enabled(), uuid, patch, actor).await
    }

    /// Disables an enabled user.
    ///
    /// # Errors
    ///
    /// Returns `SysUser` NotExist if missing or already disabled.
    pub async fn disable(&self, uuid: Uuid, actor: Uuid) -> AppResult<sys_users::Model> {
        let patch = Assignments::<sys_users::Entity>::new()
            .change(Column::DisabledAt, Change::Set(Utc::now().fixed_offset()));
        crud::update(self.db, enabled(), uuid, patch, actor).await
    }

    /// Soft-deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `SysUser` NotExist if missing.
    pub async fn delete(&self, uuid: Uuid, actor: Uuid) -> AppResult<sys_users::Model> {
        crud::soft_delete::<sys_users::Entity, _>(self.db, Condition::all(), uuid, actor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ACTOR, mock, sql_log, stamp};
    use crm_shared::Resource;

    fn user() -> sys_users::Model {
        sys_users::Model {
            id: 1,
            uuid: ACTOR,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            username: "ghopper".to_string(),
            password: hash_password("Cobol1959").unwrap(),
            disabled_at: None,
            sys_created_at: stamp(),
            sys_created_by: None,
            sys_updated_at: None,
            sys_updated_by: None,
            sys_deleted_at: None,
            sys_deleted_by: None,
        }
    }

    fn sign_up(password: &str) -> SignUpInput {
        SignUpInput {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "Grace@Example.com".to_string(),
            username: " GHopper ".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_hashes_and_lowercases() {
        let db = mock()
            .append_query_results([Vec::<sys_users::Model>::new()])
            .append_query_results([vec![user()]])
            .into_connection();

        SysUserRepository::new(&db)
            .sign_up(sign_up("Cobol1959"))
            .await
            .unwrap();

        let log = sql_log(db);
        assert!(log.contains(r#"String(Some("grace@example.com"))"#));
        assert!(log.contains(r#"String(Some("ghopper"))"#));
        assert!(log.contains("$argon2id$"));
        assert!(!log.contains("Cobol1959"));
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected() {
        let db = mock().into_connection();
        let result = SysUserRepository::new(&db).sign_up(sign_up("cobol")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(sql_log(db), "[]");
    }

    #[tokio::test]
    async fn test_taken_username_is_a_credential_clash() {
        let db = mock().append_query_results([vec![user()]]).into_connection();
        let result = SysUserRepository::new(&db).sign_up(sign_up("Cobol1959")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Exists(Resource::SysUser)));
        assert_eq!(err.error_code(), "sys_user_credential_combination_not_allowed");
    }

    #[tokio::test]
    async fn test_lookups_skip_disabled_users() {
        let db = mock()
            .append_query_results([Vec::<sys_users::Model>::new()])
            .into_connection();

        let found = SysUserRepository::new(&db)
            .find_by_username("GHopper")
            .await
            .unwrap();
        assert!(found.is_none());

        let log = sql_log(db);
        assert!(log.contains(r#""sys_users"."disabled_at" IS NULL"#));
        assert!(log.contains(r#"String(Some("ghopper"))"#));
    }

    #[tokio::test]
    async fn test_disable_targets_enabled_rows() {
        let db = mock()
            .append_query_results([Vec::<sys_users::Model>::new()])
            .into_connection();

        let result = SysUserRepository::new(&db).disable(ACTOR, ACTOR).await;
        assert!(matches!(result, Err(AppError::NotExist(Resource::SysUser))));

        let log = sql_log(db);
        assert!(log.contains(r#""disabled_at" = $"#));
        assert!(log.contains(r#""sys_users"."disabled_at" IS NULL"#));
    }

    #[test]
    fn test_password_is_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "ghopper");
    }
}
