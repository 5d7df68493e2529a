/// Authentication module
///
/// Handles token issuance/verification, password hashing,
/// and the shared claims/role types.

mod claims;
mod jwt;
mod password;

pub use claims::Claims;
pub use claims::Role;
pub use jwt::issue_token;
pub use jwt::validate_token;
pub use password::hash_password;
pub use password::validate_password_strength;
pub use password::verify_password;
