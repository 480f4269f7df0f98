//! Sys user credentials.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - The password policy and credential normalization

mod password;
mod policy;

pub use password::{PasswordError, hash_password, verify_password};
pub use policy::{MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, normalize_credential, validate_password};
