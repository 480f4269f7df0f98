//! Cookie session service for sys users.
//!
//! A session is a signed token carrying the user uuid and an expiry. Logging
//! in issues the first token; every validated request is answered with a new
//! token, sliding the expiry forward.

use crm_core::auth::verify_password;
use crm_shared::{AppError, AppResult, JwtError, JwtService};
use sea_orm::ConnectionTrait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::SysUserRepository;
use crate::entities::sys_users;

/// Session service issuing and validating session tokens.
#[derive(Debug, Clone, Copy)]
pub struct SessionService<'a, C> {
    db: &'a C,
    jwt: &'a JwtService,
}

impl<'a, C: ConnectionTrait> SessionService<'a, C> {
    /// Creates a new session service.
    #[must_use]
    pub const fn new(db: &'a C, jwt: &'a JwtService) -> Self {
        Self { db, jwt }
    }

    /// Checks credentials and opens a session.
    ///
    /// Unknown, disabled, and deleted users fail exactly like a wrong
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCredentials` if the credentials do not match
    /// a live, enabled user.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<(sys_users::Model, String)> {
        let Some(user) = SysUserRepository::new(self.db)
            .find_by_username(username)
            .await?
        else {
            warn!("login for unknown username");
            return Err(AppError::InvalidCredentials);
        };

        match verify_password(password, &user.password) {
            Ok(true) => {}
            Ok(false) => {
                warn!(user = %user.uuid, "login with wrong password");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                warn!(user = %user.uuid, error = %e, "stored password hash unusable");
                return Err(AppError::InvalidCredentials);
            }
        }

        let token = self.issue(user.uuid)?;
        debug!(user = %user.uuid, "session opened");
        Ok((user, token))
    }

    /// Validates a session token and refreshes it.
    ///
    /// # Errors
    ///
    /// - `AppError::Unauthorized` if the token is missing, expired, or forged.
    /// - `SysUser` NotExist if the subject is deleted or disabled.
    pub async fn validate(&self, token: Option<&str>) -> AppResult<(sys_users::Model, String)> {
        let token = token.ok_or_else(|| AppError::Unauthorized("missing session token".into()))?;

        let claims = self.jwt.validate_token(token).map_err(|e| match e {
            JwtError::Expired => AppError::Unauthorized("session token has expired".into()),
            other => {
                warn!(error = %other, "rejected session token");
                AppError::Unauthorized("invalid session token".into())
            }
        })?;

        let user = SysUserRepository::new(self.db).get(claims.user_id()).await?;
        let token = self.issue(user.uuid)?;
        Ok((user, token))
    }

    fn issue(&self, user_id: Uuid) -> AppResult<String> {
        self.jwt
            .issue(user_id)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
