//! Chat handlers.
//!
//! ```text
//! POST /api/chats
//! GET  /api/chats?user_id=N
//! GET  /api/chats/{chat_id}/history?user_id=N
//! POST /api/chats/{chat_id}/history?user_id=N
//! ```
//!
//! History endpoints validate in a fixed order: path, query, effective caller
//! id, ownership, then (for writes) the body. Nothing reaches the search RPC
//! unless every earlier step passed.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Caller, Error, NewChat, resolve_user_id};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ChatBody, ChatHistoryResponse, ChatMessageBody, ChatsResponse, ErrorResponse, PapersResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    optional_user_id, parse_chat_id, parse_optional_user_id, require_text,
};

/// Optional `user_id` query parameter shared by chat endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserIdParams {
    /// Positive user id; empty or `0` means "use the token's identity".
    #[param(value_type = Option<i64>)]
    pub user_id: Option<String>,
}

/// Request payload for creating a chat.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateChatRequest {
    /// Owner id; `0` or absent means "use the token's identity".
    pub user_id: i64,
    pub title: Option<String>,
}

/// Request payload for recording a query in a chat.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ChatQueryRequest {
    pub text: Option<String>,
}

/// Create a chat for the effective caller.
#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = CreateChatRequest,
    responses(
        (status = 200, description = "Chat created", body = ChatBody),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "No caller identity", body = ErrorResponse),
        (status = 403, description = "user_id does not match token", body = ErrorResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse)
    ),
    tags = ["chats"],
    operation_id = "createChat",
    security(("BearerAuth" = []))
)]
#[post("/chats")]
pub async fn create_chat(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreateChatRequest>,
) -> ApiResult<web::Json<ChatBody>> {
    let CreateChatRequest { user_id, title } = payload.into_inner();
    let user_id = resolve_user_id(optional_user_id(user_id)?, caller.user_id())?;
    let title = require_text(title, "title is required")?;
    let chat = state.papers.create_chat(NewChat { user_id, title }).await?;
    Ok(web::Json(ChatBody::from(chat)))
}

/// List the chats owned by the effective caller.
#[utoipa::path(
    get,
    path = "/api/chats",
    params(UserIdParams),
    responses(
        (status = 200, description = "Chats in backend order", body = ChatsResponse),
        (status = 400, description = "Invalid user_id", body = ErrorResponse),
        (status = 401, description = "No caller identity", body = ErrorResponse),
        (status = 403, description = "user_id does not match token", body = ErrorResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse)
    ),
    tags = ["chats"],
    operation_id = "listChats",
    security(("BearerAuth" = []))
)]
#[get("/chats")]
pub async fn list_chats(
    state: web::Data<HttpState>,
    caller: Caller,
    params: web::Query<UserIdParams>,
) -> ApiResult<web::Json<ChatsResponse>> {
    let requested = parse_optional_user_id(params.user_id.as_deref())?;
    let user_id = resolve_user_id(requested, caller.user_id())?;
    let chats = state.papers.list_chats(user_id).await?;
    Ok(web::Json(ChatsResponse {
        chats: chats.into_iter().map(ChatBody::from).collect(),
    }))
}

/// Fetch the recorded queries of a chat owned by the effective caller.
#[utoipa::path(
    get,
    path = "/api/chats/{chat_id}/history",
    params(
        ("chat_id" = i64, Path, description = "Positive chat id"),
        UserIdParams
    ),
    responses(
        (status = 200, description = "Chat history", body = ChatHistoryResponse),
        (status = 400, description = "Invalid chat_id or user_id", body = ErrorResponse),
        (status = 401, description = "No caller identity", body = ErrorResponse),
        (status = 403, description = "Chat not owned by caller", body = ErrorResponse),
        (status = 404, description = "Chat unknown to the backend", body = ErrorResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse)
    ),
    tags = ["chats"],
    operation_id = "getChatHistory",
    security(("BearerAuth" = []))
)]
#[get("/chats/{chat_id}/history")]
pub async fn get_chat_history(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    params: web::Query<UserIdParams>,
) -> ApiResult<web::Json<ChatHistoryResponse>> {
    let chat_id = parse_chat_id(&path)?;
    let requested = parse_optional_user_id(params.user_id.as_deref())?;
    let user_id = resolve_user_id(requested, caller.user_id())?;
    let chat = state.papers.authorize_chat_access(user_id, chat_id).await?;
    let entries = state.papers.chat_history(&chat).await?;
    Ok(web::Json(ChatHistoryResponse {
        chat_messages: entries.into_iter().map(ChatMessageBody::from).collect(),
    }))
}

/// Run a search recorded against a chat owned by the effective caller.
///
/// The body is read raw and decoded only after ownership is confirmed, so an
/// unauthorised caller learns nothing from body validation.
#[utoipa::path(
    post,
    path = "/api/chats/{chat_id}/history",
    params(
        ("chat_id" = i64, Path, description = "Positive chat id"),
        UserIdParams
    ),
    request_body = ChatQueryRequest,
    responses(
        (status = 200, description = "Papers found for the query", body = PapersResponse),
        (status = 400, description = "Invalid chat_id, user_id or body", body = ErrorResponse),
        (status = 401, description = "No caller identity", body = ErrorResponse),
        (status = 403, description = "Chat not owned by caller", body = ErrorResponse),
        (status = 502, description = "Backend failure", body = ErrorResponse)
    ),
    tags = ["chats"],
    operation_id = "createChatHistoryEntry",
    security(("BearerAuth" = []))
)]
#[post("/chats/{chat_id}/history")]
pub async fn create_chat_history_entry(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    params: web::Query<UserIdParams>,
    body: web::Bytes,
) -> ApiResult<web::Json<PapersResponse>> {
    let chat_id = parse_chat_id(&path)?;
    let requested = parse_optional_user_id(params.user_id.as_deref())?;
    let user_id = resolve_user_id(requested, caller.user_id())?;
    let chat = state.papers.authorize_chat_access(user_id, chat_id).await?;

    let request: ChatQueryRequest = serde_json::from_slice(&body).map_err(|err| {
        debug!(chat_id = chat_id.get(), error = %err, "malformed chat query body");
        Error::invalid_request(err.to_string())
    })?;
    let text = require_text(request.text, "text is required")?;

    let papers = state.papers.search_in_chat(&chat, text).await?;
    Ok(web::Json(PapersResponse::from(papers)))
}

#[cfg(test)]
#[path = "chats_tests.rs"]
mod tests;
