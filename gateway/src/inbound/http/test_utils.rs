//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use super::configure;
use super::health::HealthState;
use super::state::HttpState;
use crate::domain::ports::{FixtureIdentityResolver, IdentityResolver, SemanticBackend};
use crate::domain::{Chat, PaperGatewayService, Paper, RpcDeadline, UserId};

pub(crate) const BEARER: &str = "Bearer test-token";

/// Full gateway app over the given doubles.
pub(crate) fn gateway_app(
    backend: impl SemanticBackend + 'static,
    identity: impl IdentityResolver + 'static,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let papers = PaperGatewayService::new(Arc::new(backend), RpcDeadline::unbounded());
    App::new()
        .app_data(web::Data::new(HttpState::new(papers, Arc::new(identity))))
        .app_data(web::Data::new(HealthState::new()))
        .configure(configure)
}

/// Identity resolver accepting every token as user `raw`.
pub(crate) fn token_for(raw: i64) -> FixtureIdentityResolver {
    FixtureIdentityResolver::new(UserId::new(raw).expect("positive id"))
}

pub(crate) fn chat(chat_id: i64, user_id: i64) -> Chat {
    Chat {
        chat_id,
        user_id,
        updated_at: "2024-05-01T10:00:00Z".to_owned(),
        title: format!("chat {chat_id}"),
    }
}

pub(crate) fn paper(id: &str) -> Paper {
    Paper {
        id: id.to_owned(),
        title: format!("title {id}"),
        abstract_text: format!("abstract {id}"),
        year: 2020,
        best_oa_location: format!("https://oa.example/{id}"),
    }
}

/// Paper ids of a `{"papers": [...]}` body, in order.
pub(crate) fn paper_ids(body: &Value) -> Vec<String> {
    body["papers"]
        .as_array()
        .expect("papers array")
        .iter()
        .map(|paper| paper["id"].as_str().expect("paper id").to_owned())
        .collect()
}
