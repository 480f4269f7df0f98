//! Password hashing for sys users.
//!
//! Stored hashes are Argon2id PHC strings with a random salt per user.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored value is not a PHC hash.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
///
/// # Example
///
/// ```
/// use crm_core::auth::hash_password;
///
/// let hash = hash_password("Operator2024").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unreadable hash or a hashing fault is an
/// error.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` or `PasswordError::Verify`.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let hash = hash_password("Operator2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Operator2024", &hash).unwrap());
        assert!(!verify_password("operator2024", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let first = hash_password("Operator2024").unwrap();
        let second = hash_password("Operator2024").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_plaintext_in_column_is_malformed() {
        assert!(matches!(
            verify_password("Operator2024", "Operator2024"),
            Err(PasswordError::MalformedHash)
        ));
    }
}
