//! Application-wide error types.

use thiserror::Error;

use crate::resource::Resource;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message returned for every failure the service did not anticipate.
pub const UNHANDLED_MESSAGE: &str = "Something unexpected has occurred.";

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// A live row was expected but not found.
    #[error("{0} record does not exist.")]
    NotExist(Resource),

    /// A create or update would duplicate a live row.
    #[error("{0} record already exists. A duplicate record is not allowed.")]
    Exists(Resource),

    /// Username and password did not match a live user.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Entity type does not match the requested child shape.
    #[error("entity_type is invalid.")]
    EntityTypeInvalid,

    /// Entity payload matched neither shape.
    #[error("Entity data is invalid, a valid payload must be provided.")]
    EntityDataInvalid,

    /// Entity payload carried both shapes.
    #[error("Entity can only be an individual or non-individual, not both.")]
    EntityPayloadOverloaded,

    /// Request failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session token missing, expired, or invalid.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotExist(_)
            | Self::Exists(_)
            | Self::InvalidCredentials
            | Self::EntityTypeInvalid
            | Self::EntityDataInvalid
            | Self::EntityPayloadOverloaded
            | Self::Validation(_)
            | Self::Database(_)
            | Self::Internal(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotExist(resource) => resource.not_exist_code(),
            Self::Exists(resource) => resource.exists_code(),
            Self::InvalidCredentials => "invalid_credentials",
            Self::EntityTypeInvalid => "entity_type_invalid",
            Self::EntityDataInvalid => "entity_data_invalid",
            Self::EntityPayloadOverloaded => "entity_payload_overloaded",
            Self::Validation(_) => "validation_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Database(_) | Self::Internal(_) => "unhandled_exception",
        }
    }

    /// Returns the message exposed to clients.
    ///
    /// Storage and internal failures are masked behind [`UNHANDLED_MESSAGE`].
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => UNHANDLED_MESSAGE.to_string(),
            Self::Validation(detail) | Self::Unauthorized(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
