/// Role Gate Middleware
///
/// Mounted inside `JwtMiddleware` on scopes that need a specific role. It
/// runs before any extractor, so a caller with the wrong role gets 403 even
/// when its body or path would not parse.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{Claims, Role};
use crate::error::{AppError, AuthError};

pub struct RoleGate {
    role: Role,
}

impl RoleGate {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RoleGateService {
            service: Rc::new(service),
            role: self.role,
        }))
    }
}

pub struct RoleGateService<S> {
    service: Rc<S>,
    role: Role,
}

/// Claims missing from the request means the gate was mounted without
/// `JwtMiddleware` in front of it; that is treated as unauthenticated.
pub fn authorize(claims: Option<&Claims>, role: Role) -> Result<(), AppError> {
    claims
        .ok_or(AppError::Auth(AuthError::MissingToken))?
        .require_role(role)
}

impl<S, B> Service<ServiceRequest> for RoleGateService<S>
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
        let verdict = authorize(req.extensions().get::<Claims>(), self.role);

        match verdict {
            Ok(()) => {
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims::new("someone@example.com".to_string(), role, 60, "qwizza".to_string())
    }

    #[test]
    fn test_matching_role_passes() {
        assert!(authorize(Some(&claims(Role::Admin)), Role::Admin).is_ok());
    }

    #[test]
    fn test_wrong_role_is_forbidden() {
        assert!(matches!(
            authorize(Some(&claims(Role::Student)), Role::Admin),
            Err(AppError::Auth(AuthError::Forbidden))
        ));
    }

    #[test]
    fn test_missing_claims_is_unauthorized() {
        assert!(matches!(
            authorize(None, Role::Admin),
            Err(AppError::Auth(AuthError::MissingToken))
        ));
    }
}
