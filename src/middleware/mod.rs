/// Middleware module
///
/// Custom middleware for authentication and role checks.

mod jwt_middleware;
mod role_gate;

pub use jwt_middleware::authenticate;
pub use jwt_middleware::JwtMiddleware;
pub use role_gate::RoleGate;
