//! Request extractors shared by the route modules.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use crm_db::entities::sys_users;
use crm_shared::{AppError, types::PageRequest};
use uuid::Uuid;

use crate::ApiError;

/// `page` and `limit` query parameters, bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination(pub PageRequest);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<PageRequest>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(request.validated()?))
    }
}

/// The sys user the session middleware resolved for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub sys_users::Model);

impl CurrentUser {
    /// Uuid stamped into the actor columns.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.0.uuid
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("missing session token".into()).into())
    }
}
