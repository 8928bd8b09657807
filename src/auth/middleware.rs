//! Bearer-token gate for protected routes.
//!
//! [`AuthGate`] wraps a scope or resource. Requests without a valid token are
//! answered with a uniform 401 before the wrapped service is called; accepted
//! requests carry an [`AuthenticatedUser`] in their extensions.

use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::auth::token::TokenVerifier;
use crate::error::{AppError, AuthError};

const BEARER_SCHEME: &str = "Bearer";

/// Identity established by the gate for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Only present when the route sits behind `AuthGate`.
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .copied()
                .ok_or(AppError::AuthError(AuthError::Unauthorized)),
        )
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`. The scheme name
/// is case-insensitive (RFC 7235).
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
}

impl AuthGate {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service,
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: S,
    verifier: Arc<TokenVerifier>,
}

impl<S> AuthGateMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, AuthError> {
        let token = extract_bearer_token(req.headers()).ok_or_else(|| {
            debug!("No bearer token on request to {}", req.path());
            AuthError::Unauthorized
        })?;

        let account_id = self.verifier.verify(token).map_err(|e| {
            warn!("Rejected token on request to {}: {}", req.path(), e);
            AuthError::Unauthorized
        })?;

        Ok(AuthenticatedUser { account_id })
    }
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user = match self.authenticate(&req) {
            Ok(user) => user,
            Err(e) => {
                let response = req
                    .error_response(AppError::AuthError(e))
                    .map_into_right_body();
                return Box::pin(ready(Ok(response)));
            }
        };

        req.extensions_mut().insert(user);
        let fut = self.service.call(req);

        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
