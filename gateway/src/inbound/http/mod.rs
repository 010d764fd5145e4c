//! HTTP inbound adapter exposing the REST surface of the gateway.
//!
//! Everything under `/api` passes through [`auth::Authenticate`]; health
//! probes do not.

pub mod auth;
pub mod chats;
pub mod cors;
pub mod error;
pub mod health;
pub mod papers;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

use self::auth::Authenticate;
use self::error::extractor_error;

/// Register the gateway routes and extractor error handlers.
///
/// The caller provides `web::Data<HttpState>` and `web::Data<HealthState>`
/// as app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use gateway::inbound::http::configure;
/// use gateway::inbound::http::health::HealthState;
///
/// let _app = App::new()
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .service(
            web::scope("/api")
                .wrap(Authenticate)
                .service(papers::search_papers)
                .service(papers::add_paper)
                .service(chats::create_chat)
                .service(chats::list_chats)
                .service(chats::get_chat_history)
                .service(chats::create_chat_history_entry),
        )
        .service(health::ready)
        .service(health::live);
}
