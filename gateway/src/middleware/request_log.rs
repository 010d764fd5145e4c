//! Access log middleware.
//!
//! Emits one structured event per response with the method, path, status and
//! latency. Health probes are skipped. Headers are never logged, so bearer
//! tokens cannot leak into logs.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

const SKIPPED_PREFIX: &str = "/health/";

/// Middleware logging every completed request.
///
/// Wrap it inside [`Trace`](crate::Trace) so events are emitted while the
/// trace identifier is in scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gateway::{RequestLog, Trace};
///
/// let app = App::new().wrap(RequestLog).wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let skip = req.path().starts_with(SKIPPED_PREFIX);
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(async move {
            let result = fut.await;
            if !skip {
                let status = match &result {
                    Ok(res) => res.status(),
                    Err(err) => err.as_response_error().status_code(),
                };
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                log_completion(&method, &path, status, latency_ms);
            }
            result
        })
    }
}

fn log_completion(method: &str, path: &str, status: StatusCode, latency_ms: u64) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        error!(method, path, status = status_code, latency_ms, "request failed");
    } else if status.is_client_error() {
        warn!(method, path, status = status_code, latency_ms, "request rejected");
    } else {
        info!(method, path, status = status_code, latency_ms, "request completed");
    }
}
