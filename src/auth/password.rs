/// Password Hashing and Verification
///
/// bcrypt at a fixed work factor. Strength rules are checked separately so
/// that hashing itself only fails on internal errors.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
/// bcrypt only hashes the first 72 bytes of its input.
const MAX_PASSWORD_LENGTH: usize = 72;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `AppError::Hashing` if bcrypt fails (entropy or resource failure)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hashing(e.to_string()))
}

/// Verify a password against its stored hash
///
/// A malformed stored hash is reported as a mismatch, so callers see one
/// generic credential failure either way.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            false
        }
    }
}

/// Validate password strength requirements
///
/// Requirements:
/// - 8 to 72 bytes
/// - At least one digit, one lowercase and one uppercase letter
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }

    // Longer inputs would collide with any string sharing their first 72 bytes
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "ValidPassword123";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("ValidPassword123").unwrap();
        let second = hash_password("ValidPassword123").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("ValidPassword123").expect("Failed to hash password");

        assert!(verify_password("ValidPassword123", &hash));
        assert!(!verify_password("WrongPassword123", &hash));
        assert!(!verify_password("validpassword123", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("ValidPassword123", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("ValidPassword123").is_ok());
        assert!(validate_password_strength("").is_err());
        assert!(validate_password_strength("Short1").is_err());
        assert!(validate_password_strength(&("a".repeat(MAX_PASSWORD_LENGTH) + "A1")).is_err());
        assert!(validate_password_strength("NoDigitsPassword").is_err());
        assert!(validate_password_strength("NOLOWERCASE1").is_err());
        assert!(validate_password_strength("nouppercase1").is_err());
    }

    #[test]
    fn test_password_over_bcrypt_limit_is_rejected() {
        let at_limit = format!("Aa1{}", "x".repeat(MAX_PASSWORD_LENGTH - 3));
        let over_limit = format!("{}x", at_limit);
        assert_eq!(at_limit.len(), 72);

        assert!(validate_password_strength(&at_limit).is_ok());
        assert!(matches!(
            validate_password_strength(&over_limit),
            Err(AppError::Validation(ValidationError::TooLong(_, 72)))
        ));
    }

    #[test]
    fn test_accepted_password_has_no_truncation_collisions() {
        let password = format!("Aa1{}", "x".repeat(60));
        validate_password_strength(&password).expect("password within limit");
        let hash = hash_password(&password).unwrap();

        assert!(verify_password(&password, &hash));
        assert!(!verify_password(&format!("{}DIFFERENT", password), &hash));
    }
}
