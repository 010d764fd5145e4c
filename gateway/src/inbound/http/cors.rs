//! Cross-origin policy for browser clients.
//!
//! Built once per worker from the configured origin list. Preflights are
//! answered here, before routing, so they never reach [`super::auth`].

use actix_cors::Cors;
use actix_web::http::header;

use crate::config::ANY_ORIGIN;

const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];
const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS middleware admitting `origins`.
///
/// An entry equal to `*` admits any origin; the request origin is echoed back
/// so credentials keep working. Other entries must already be normalised
/// `scheme://host[:port]` origins.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gateway::inbound::http::cors::cors_policy;
///
/// let _app = App::new().wrap(cors_policy(&["https://app.example".to_owned()]));
/// ```
#[must_use]
pub fn cors_policy(origins: &[String]) -> Cors {
    let base = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS);

    if origins.iter().any(|origin| origin == ANY_ORIGIN) {
        return base.allow_any_origin();
    }
    origins
        .iter()
        .fold(base, |cors, origin| cors.allowed_origin(origin))
}
