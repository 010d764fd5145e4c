//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every gateway route, the wire schemas from
//! [`crate::inbound::http::schemas`], and the bearer-token security scheme
//! enforced on `/api`. The document is served by Swagger UI when enabled.

use url::Url;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};

use crate::inbound::http::chats::{ChatQueryRequest, CreateChatRequest};
use crate::inbound::http::papers::{AddPaperRequest, AddPaperResponse, WorkRef};
use crate::inbound::http::schemas::{
    ChatBody, ChatHistoryResponse, ChatMessageBody, ChatsResponse, ErrorResponse, PaperBody,
    PapersResponse,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Token validated by the identity service on every request.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the gateway.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Paper gateway API",
        description = "REST facade over the semantic paper search backend."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::papers::search_papers,
        crate::inbound::http::papers::add_paper,
        crate::inbound::http::chats::create_chat,
        crate::inbound::http::chats::list_chats,
        crate::inbound::http::chats::get_chat_history,
        crate::inbound::http::chats::create_chat_history_entry,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorResponse,
        PaperBody,
        PapersResponse,
        WorkRef,
        AddPaperRequest,
        AddPaperResponse,
        CreateChatRequest,
        ChatQueryRequest,
        ChatBody,
        ChatsResponse,
        ChatMessageBody,
        ChatHistoryResponse,
    )),
    tags(
        (name = "papers", description = "Paper search and indexing"),
        (name = "chats", description = "Chats and their recorded queries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Document advertising `public_url` as its only server.
    ///
    /// Only the scheme, host and port are kept; without a public URL the
    /// relative `/` server stays in place.
    #[must_use]
    pub fn for_public_url(public_url: Option<&Url>) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(url) = public_url {
            doc.servers = Some(vec![Server::new(url.origin().ascii_serialization())]);
        }
        doc
    }
}
