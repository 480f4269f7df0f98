//! Record-existence guards.
//!
//! Every read, update, and delete path checks its fetched rows with
//! [`assert_present`]; every create path checks its duplicate lookup with
//! [`assert_absent`]. Both log the violated expectation before failing.

use crm_shared::AppError;
use tracing::warn;

/// A fetch result that may or may not hold a record.
pub trait Presence: Sized {
    /// What a present result yields.
    type Value;

    /// Returns the record when present.
    fn into_present(self) -> Option<Self::Value>;
}

impl<T> Presence for Option<T> {
    type Value = T;

    fn into_present(self) -> Option<T> {
        self
    }
}

impl<T> Presence for Vec<T> {
    type Value = Self;

    fn into_present(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Fails with `error` when `found` holds a record.
///
/// # Errors
///
/// Returns `error` when a row was found.
pub fn assert_absent<P: Presence>(found: P, error: AppError) -> Result<(), AppError> {
    if found.into_present().is_some() {
        warn!(error_code = error.error_code(), "record already exists, duplicate not allowed");
        return Err(error);
    }
    Ok(())
}

/// Returns the record held by `found`, failing with `error` when it is empty.
///
/// # Errors
///
/// Returns `error` when nothing was found.
pub fn assert_present<P: Presence>(found: P, error: AppError) -> Result<P::Value, AppError> {
    found.into_present().ok_or_else(|| {
        warn!(error_code = error.error_code(), "record does not exist");
        error
    })
}
