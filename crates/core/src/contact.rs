//! Contact field normalization for e-mails, phone numbers, and addresses.

use crm_shared::AppError;
use validator::ValidateEmail;

/// A lowercased e-mail split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    /// Full address.
    pub email: String,
    /// Part before the last `@`.
    pub username: String,
    /// Part after the last `@`.
    pub domain: String,
}

/// Trims, lowercases, and splits an e-mail address.
///
/// # Errors
///
/// Returns `AppError::Validation` if the address is not a valid e-mail.
pub fn normalize_email(raw: &str) -> Result<NormalizedEmail, AppError> {
    let email = raw.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::Validation(format!("'{email}' is not a valid email")));
    }
    let (username, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| AppError::Validation(format!("'{email}' is not a valid email")))?;

    Ok(NormalizedEmail {
        username: username.to_string(),
        domain: domain.to_string(),
        email,
    })
}

/// Checks that `value` is made of ASCII digits and has exactly `len` of them.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `field`.
pub fn fixed_digits(field: &str, value: &str, len: usize) -> Result<(), AppError> {
    if value.len() == len && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} must be {len} digits")))
    }
}

/// Checks that `value` holds between one and `max` ASCII digits.
///
/// # Errors
///
/// Returns `AppError::Validation` naming `field`.
pub fn max_digits(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if (1..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} must be at most {max} digits")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_splits_parts() {
        let email = normalize_email("  Ada.Lovelace@Example.COM ").unwrap();
        assert_eq!(email.email, "ada.lovelace@example.com");
        assert_eq!(email.username, "ada.lovelace");
        assert_eq!(email.domain, "example.com");
    }

    #[test]
    fn test_normalize_email_rejects_garbage() {
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_fixed_digits() {
        assert!(fixed_digits("zip", "94107", 5).is_ok());
        assert!(fixed_digits("zip", "9410", 5).is_err());
        assert!(fixed_digits("zip", "9410a", 5).is_err());
    }

    #[test]
    fn test_max_digits() {
        assert!(max_digits("extension", "12", 10).is_ok());
        assert!(max_digits("extension", "", 10).is_err());
        assert!(max_digits("extension", "12345678901", 10).is_err());
    }
}
