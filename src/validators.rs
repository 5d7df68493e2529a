/// Input validators for signup/login identities and free-text fields
/// 1. Length limits on every accepted string
/// 2. Email format validation
/// 3. Username checks against control characters and SQL-looking payloads

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_USERNAME_LENGTH: usize = 64;
const MAX_PHONE_LENGTH: usize = 32;
pub const MAX_TITLE_LENGTH: usize = 255;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()-]{3,}$").unwrap();

    static ref SQL_INJECTION_PATTERNS: [Regex; 3] = [
        Regex::new(r"(?i)\s+UNION\s+").unwrap(),
        Regex::new(r"(--|;|/\*|\*/)").unwrap(),
        Regex::new(r#"(?i)(\bOR\b|\bAND\b)\s*(['"][0-9]*['"]|[0-9]*)\s*=\s*(['"][0-9]*['"]|[0-9]*|True|False)"#).unwrap(),
    ];
}

/// Validates and normalizes (trims) an email address
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) || trimmed.matches('@').count() != 1 {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    if contains_sql_injection_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a username
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if trimmed.chars().any(|c| c.is_control()) || contains_sql_injection_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("username".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates an optional phone number; blank counts as absent
pub fn is_valid_phone(phone: Option<&str>) -> Result<Option<String>, ValidationError> {
    let trimmed = match phone.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(p) => p,
    };

    if trimmed.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong("phone".to_string(), MAX_PHONE_LENGTH));
    }

    if !PHONE_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("phone".to_string()));
    }

    Ok(Some(trimmed.to_string()))
}

/// Requires a non-blank free-text field no longer than `max` bytes
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    if value.len() > max {
        return Err(ValidationError::TooLong(field.to_string(), max));
    }
    if value.contains('\0') {
        return Err(ValidationError::SuspiciousContent(field.to_string()));
    }
    Ok(())
}

fn contains_sql_injection_patterns(input: &str) -> bool {
    SQL_INJECTION_PATTERNS.iter().any(|pattern| pattern.is_match(input))
}
