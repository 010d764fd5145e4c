//! Bearer-token gatekeeping for the `/api` scope.
//!
//! [`Authenticate`] validates the `Authorization` header with the configured
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) before any
//! handler runs and stores the resulting [`Caller`] in the request
//! extensions. Handlers read it back through the [`Caller`] extractor.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use super::state::HttpState;
use crate::domain::{BearerToken, Caller, Error};

/// Path of the identity service's own validation endpoint; never re-validated.
pub const VALIDATION_BYPASS_PATH: &str = "/api/auth/validate";

const TOKEN_REQUIRED: &str = "Token required";

/// Middleware resolving the caller identity of every request it wraps.
///
/// Requests without a `Bearer` token are answered with `401` and never
/// reach the identity service or the handler.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use gateway::inbound::http::auth::Authenticate;
///
/// let _scope = web::scope("/api").wrap(Authenticate);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`Authenticate`].
pub struct AuthenticateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            if bypasses_validation(&req) {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            let Some(token) = bearer_token(&req) else {
                debug!(path = req.path(), "request without bearer token");
                return Ok(reject(req, &Error::unauthorized(TOKEN_REQUIRED)));
            };

            let Some(state) = req.app_data::<web::Data<HttpState>>().cloned() else {
                error!("HttpState missing from app data; cannot authenticate");
                return Ok(reject(req, &Error::internal("http state not configured")));
            };

            match state.identity.resolve(&token).await {
                Ok(caller) => {
                    req.extensions_mut().insert(caller);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(failure) => Ok(reject(req, &Error::from(failure))),
            }
        })
    }
}

fn bypasses_validation(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS || req.path() == VALIDATION_BYPASS_PATH
}

fn bearer_token(req: &ServiceRequest) -> Option<BearerToken> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BearerToken::parse)
}

fn reject<B>(req: ServiceRequest, error: &Error) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response())
        .map_into_right_body()
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Absent only when a handler is mounted outside `Authenticate`.
        ready(
            req.extensions()
                .get::<Caller>()
                .copied()
                .ok_or_else(|| Error::unauthorized(TOKEN_REQUIRED)),
        )
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
