//! Credential rules applied at sign-up and on password change.

use crm_shared::AppError;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Longest accepted password.
pub const MAX_PASSWORD_LEN: usize = 30;

/// Checks a plaintext password against the policy.
///
/// # Errors
///
/// Returns `AppError::Validation` describing the first rule broken.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    let rule = if len < MIN_PASSWORD_LEN {
        Some("Password must be at least 8 characters long.")
    } else if len > MAX_PASSWORD_LEN {
        Some("Password must be less than or equal to 30 characters.")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter.")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter.")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one numerical character.")
    } else {
        None
    };

    rule.map_or(Ok(()), |msg| Err(AppError::Validation(msg.to_string())))
}

/// Trims and lowercases a username or e-mail used as a login credential.
#[must_use]
pub fn normalize_credential(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Short1", "at least 8")]
    #[case("Waytoolongpassword1234567890abc", "less than or equal to 30")]
    #[case("alllower123", "uppercase")]
    #[case("ALLUPPER123", "lowercase")]
    #[case("NoDigitsHere", "numerical")]
    fn test_policy_rejections(#[case] password: &str, #[case] fragment: &str) {
        let err = validate_password(password).unwrap_err();
        assert!(err.message().contains(fragment), "{password}: {}", err.message());
    }

    #[test]
    fn test_policy_accepts_valid_password() {
        assert!(validate_password("Operator2024").is_ok());
    }

    #[test]
    fn test_normalize_credential() {
        assert_eq!(normalize_credential("  Ada@Example.com "), "ada@example.com");
    }
}
