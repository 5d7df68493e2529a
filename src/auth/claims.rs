/// JWT Claims structure
///
/// The single claims type shared by token issuance and verification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AuthError};

/// Coarse authorization tier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Parses the value stored in `users.role`.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(AppError::Internal(format!("Unknown role '{}'", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT Claims for bearer tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User email
    pub email: String,
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    pub fn new(email: String, role: Role, expiry_seconds: i64, issuer: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            email,
            role,
            iss: issuer,
            exp: now + expiry_seconds,
            iat: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Role check behind `RoleGate`; a valid token with the wrong role is Forbidden,
    /// never Unauthorized.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            tracing::warn!(
                email = %self.email,
                role = %self.role,
                required = %role,
                "Role check failed"
            );
            return Err(AppError::Auth(AuthError::Forbidden));
        }
        Ok(())
    }
}
