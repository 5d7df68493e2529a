/// Bearer Token Middleware (Auth Gate)
///
/// Validates the token in the Authorization header and injects the verified
/// claims into request extensions. Handlers behind this middleware read them
/// with `web::ReqData<Claims>`; no handler ever runs with unverified claims.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{validate_token, Claims};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

const BEARER_PREFIX: &str = "Bearer ";

/// JWT middleware for protecting scopes
pub struct JwtMiddleware {
    jwt_config: JwtSettings,
}

impl JwtMiddleware {
    pub fn new(jwt_config: JwtSettings) -> Self {
        Self { jwt_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
}

/// Runs the gate checks in order: header present, bearer prefix, then
/// signature/algorithm/issuer/expiry via `validate_token`.
pub fn authenticate(header: Option<&str>, jwt_config: &JwtSettings) -> Result<Claims, AppError> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    validate_token(token, jwt_config)
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match authenticate(header, &self.jwt_config) {
            Ok(claims) => {
                tracing::debug!(
                    email = %claims.email,
                    role = %claims.role,
                    "JWT validated successfully"
                );
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), "Request rejected by auth gate: {}", e);
                Box::pin(async move { Err(e.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{issue_token, Role};

    fn config() -> JwtSettings {
        JwtSettings::new("middleware-test-secret-0123456789abcdef")
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let config = config();
        let headers = vec![
            None,
            Some(""),
            Some("Bearer"),                // missing token
            Some("Bearer "),               // empty token
            Some("Basic dXNlcjpwYXNz"),    // not Bearer
            Some("BearerToken"),           // missing space
        ];

        for header in headers {
            let result = authenticate(header, &config);
            assert!(
                matches!(result, Err(AppError::Auth(AuthError::MissingToken))),
                "header {:?} should be rejected as missing",
                header
            );
        }
    }

    #[test]
    fn test_valid_bearer_token() {
        let config = config();
        let token = issue_token("student@example.com", Role::Student, &config).unwrap();

        let claims = authenticate(Some(&format!("Bearer {}", token)), &config).unwrap();
        assert_eq!(claims.email, "student@example.com");
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn test_garbage_bearer_token() {
        let result = authenticate(Some("Bearer invalid.token.here"), &config());
        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }
}
