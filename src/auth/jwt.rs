/// JWT Token Issuance and Verification
///
/// Tokens are HS256-signed with the configured key. Verification pins the
/// algorithm, issuer and expiry; any failure collapses into one generic
/// `AuthError::TokenInvalid`.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, Role};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issue a signed token for a verified identity
///
/// # Errors
/// - `ConfigError::MissingRequired` if no signing key is configured
/// - `Internal` if encoding fails
pub fn issue_token(email: &str, role: Role, config: &JwtSettings) -> Result<String, AppError> {
    let key = config.ensure_signing_key()?;
    let claims = Claims::new(
        email.to_string(),
        role,
        config.token_expiry_seconds,
        config.issuer.clone(),
    );

    encode_claims(&claims, key)
}

fn encode_claims(claims: &Claims, key: &[u8]) -> Result<String, AppError> {
    encode(
        &Header::new(SIGNING_ALGORITHM),
        claims,
        &EncodingKey::from_secret(key),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate a token and extract its claims
///
/// Rejects malformed structure, bad signature, an algorithm other than
/// HS256, a foreign issuer, and expired tokens (no leeway).
pub fn validate_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let key = config.ensure_signing_key()?;

    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "iss"]);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("JWT validation error: {}", e);
            AppError::Auth(AuthError::TokenInvalid)
        })
}
