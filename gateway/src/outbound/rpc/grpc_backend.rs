//! tonic-backed [`SemanticBackend`].
//!
//! One lazily connected channel is shared by all requests; tonic multiplexes
//! calls over it, so cloning the client per call is cheap.

use std::time::Duration;

use async_trait::async_trait;
use tonic::Code;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use super::proto::{self, semantic_service_client::SemanticServiceClient};
use crate::domain::ports::{RpcFailure, SemanticBackend};
use crate::domain::{
    AddPaperOutcome, Chat, ChatHistoryEntry, ChatId, NewChat, NewPaper, Paper, SearchQuery, UserId,
};

/// Semantic backend reached over gRPC.
#[derive(Debug, Clone)]
pub struct GrpcSemanticBackend {
    client: SemanticServiceClient<Channel>,
}

impl GrpcSemanticBackend {
    /// Prepare a channel to `addr` without dialling it.
    ///
    /// The first call opens the connection, so a backend that is down at
    /// startup only fails the requests that need it. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when `addr` is not a valid URI.
    pub fn connect_lazy(
        addr: &str,
        connect_timeout: Duration,
    ) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(addr.to_owned())?
            .connect_timeout(connect_timeout)
            .connect_lazy();
        Ok(Self::from_channel(channel))
    }

    /// Wrap an existing channel.
    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: SemanticServiceClient::new(channel),
        }
    }

    fn client(&self) -> SemanticServiceClient<Channel> {
        self.client.clone()
    }
}

#[async_trait]
impl SemanticBackend for GrpcSemanticBackend {
    async fn search_papers(&self, query: SearchQuery) -> Result<Vec<Paper>, RpcFailure> {
        let reply = self
            .client()
            .search_paper(proto::SearchRequest::from(query))
            .await
            .map_err(map_status)?
            .into_inner();
        Ok(reply.papers.into_iter().map(Paper::from).collect())
    }

    async fn add_paper(&self, paper: NewPaper) -> Result<AddPaperOutcome, RpcFailure> {
        let reply = self
            .client()
            .add_paper(proto::AddRequest::from(paper))
            .await
            .map_err(map_status)?
            .into_inner();
        if reply.error.is_empty() {
            Ok(AddPaperOutcome::Added)
        } else {
            Ok(AddPaperOutcome::Rejected(reply.error))
        }
    }

    async fn create_chat(&self, chat: NewChat) -> Result<Option<Chat>, RpcFailure> {
        let reply = self
            .client()
            .create_new_chat(proto::Chat::from(chat))
            .await
            .map_err(map_status)?
            .into_inner();
        Ok(reply.chat.map(Chat::from))
    }

    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, RpcFailure> {
        let reply = self
            .client()
            .get_user_chats(proto::UserChatsReq {
                user_id: user_id.get(),
            })
            .await
            .map_err(map_status)?
            .into_inner();
        Ok(reply.chats.into_iter().map(Chat::from).collect())
    }

    async fn chat_history(&self, chat_id: ChatId) -> Result<Vec<ChatHistoryEntry>, RpcFailure> {
        let reply = self
            .client()
            .get_chat_history(proto::HistoryReq {
                chat_id: chat_id.get(),
            })
            .await
            .map_err(map_status)?
            .into_inner();
        Ok(reply
            .chat_messages
            .into_iter()
            .map(ChatHistoryEntry::from)
            .collect())
    }
}

fn map_status(status: tonic::Status) -> RpcFailure {
    debug!(code = ?status.code(), message = status.message(), "semantic backend call failed");
    let message = status.message().to_owned();
    match status.code() {
        Code::InvalidArgument => RpcFailure::invalid_argument(message),
        Code::NotFound => RpcFailure::not_found(message),
        Code::DeadlineExceeded => RpcFailure::deadline_exceeded(message),
        Code::Unavailable => RpcFailure::unavailable(message),
        Code::PermissionDenied => RpcFailure::permission_denied(message),
        Code::Unauthenticated => RpcFailure::unauthenticated(message),
        _ => RpcFailure::other(message),
    }
}
