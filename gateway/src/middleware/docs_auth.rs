//! Basic-auth guard for the API documentation routes.
//!
//! Only `/docs` and `/api-docs` paths are checked; every other request passes
//! through untouched. Without credentials the guard is a no-op.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE};
use actix_web::{HttpResponse, ResponseError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::config::DocsCredentials;
use crate::domain::Error;

const GUARDED_PREFIXES: [&str; 2] = ["/docs", "/api-docs"];
const BASIC_PREFIX: &str = "Basic ";
const CHALLENGE: &str = "Basic realm=\"docs\"";
const CREDENTIALS_REQUIRED: &str = "docs credentials required";

/// Middleware demanding basic auth on the documentation routes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gateway::config::DocsCredentials;
/// use gateway::middleware::DocsAuth;
///
/// let _app = App::new().wrap(DocsAuth::new(Some(DocsCredentials::new("admin", "s3cret"))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocsAuth {
    credentials: Option<Arc<DocsCredentials>>,
}

impl DocsAuth {
    /// Guard the docs with `credentials`; `None` leaves them open.
    #[must_use]
    pub fn new(credentials: Option<DocsCredentials>) -> Self {
        Self {
            credentials: credentials.map(Arc::new),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for DocsAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = DocsAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DocsAuthMiddleware {
            service: Rc::new(service),
            credentials: self.credentials.clone(),
        }))
    }
}

/// Service wrapper produced by [`DocsAuth`].
pub struct DocsAuthMiddleware<S> {
    service: Rc<S>,
    credentials: Option<Arc<DocsCredentials>>,
}

impl<S, B> Service<ServiceRequest> for DocsAuthMiddleware<S>
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
        let admitted = match self.credentials.as_deref() {
            Some(credentials) if is_guarded(req.path()) => presents(&req, credentials),
            _ => true,
        };
        Box::pin(async move {
            if admitted {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }
            debug!(path = req.path(), "docs request without valid credentials");
            let response = challenge(&Error::unauthorized(CREDENTIALS_REQUIRED));
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}

fn is_guarded(path: &str) -> bool {
    GUARDED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn presents(req: &ServiceRequest, credentials: &DocsCredentials) -> bool {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BASIC_PREFIX))
        .and_then(|encoded| STANDARD.decode(encoded.trim()).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .is_some_and(|pair| {
            pair.split_once(':')
                .is_some_and(|(user, password)| credentials.matches(user, password))
        })
}

fn challenge(error: &Error) -> HttpResponse {
    let mut response = error.error_response();
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}
