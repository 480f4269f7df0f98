//! Update payload conventions.
//!
//! An omitted (or null) field leaves the stored value untouched. A text field
//! sent as `""` clears the column to NULL. Whitespace is trimmed first, so a
//! blank string clears too.

use crm_shared::AppError;

/// What an update does to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// Leave the stored value as is.
    Keep,
    /// Store NULL.
    Clear,
    /// Store the value.
    Set(T),
}

impl<T> Change<T> {
    /// Returns true when the column is not touched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Maps the carried value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Change<U> {
        match self {
            Self::Keep => Change::Keep,
            Self::Clear => Change::Clear,
            Self::Set(value) => Change::Set(f(value)),
        }
    }

    /// Maps the carried value with a fallible function.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Change<U>, E> {
        Ok(match self {
            Self::Keep => Change::Keep,
            Self::Clear => Change::Clear,
            Self::Set(value) => Change::Set(f(value)?),
        })
    }

    /// Returns the value being stored, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Keep | Self::Clear => None,
        }
    }

    /// Converts to the nullable value to store, `None` meaning keep.
    #[must_use]
    pub fn into_assignment(self) -> Option<Option<T>> {
        match self {
            Self::Keep => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }
}

/// Coerces a patched text field, mapping blank strings to NULL.
#[must_use]
pub fn text(value: Option<String>) -> Change<String> {
    match value {
        None => Change::Keep,
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Change::Clear
            } else if trimmed.len() == raw.len() {
                Change::Set(raw)
            } else {
                Change::Set(trimmed.to_string())
            }
        }
    }
}

/// Coerces a patched text field whose column is NOT NULL.
///
/// # Errors
///
/// Returns `AppError::Validation` when the field would be cleared.
pub fn required_text(field: &str, value: Option<String>) -> Result<Change<String>, AppError> {
    match text(value) {
        Change::Clear => Err(AppError::Validation(format!("{field} cannot be blank"))),
        other => Ok(other),
    }
}

/// Wraps a patched non-text field, which can be set but never cleared.
#[must_use]
pub fn value<T>(value: Option<T>) -> Change<T> {
    value.map_or(Change::Keep, Change::Set)
}

/// Trims an optional text field on create, treating blanks as absent.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    match text(value) {
        Change::Set(v) => Some(v),
        Change::Keep | Change::Clear => None,
    }
}

/// Trims a required text field on create.
///
/// # Errors
///
/// Returns `AppError::Validation` when the field is blank.
pub fn required(field: &str, value: String) -> Result<String, AppError> {
    optional_text(Some(value)).ok_or_else(|| AppError::Validation(format!("{field} cannot be blank")))
}
