//! Use-cases behind the public routes.
//!
//! Every backend call is bounded by the configured [`RpcDeadline`] and every
//! failure is logged with its correlating ids before being translated into a
//! domain [`Error`]. Bearer tokens never reach this layer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use super::ports::{RpcFailure, SemanticBackend};
use super::{
    AddPaperOutcome, Chat, ChatHistoryEntry, ChatId, Error, NewChat, NewPaper, Paper, SearchQuery,
    UserId,
};

/// Upper bound applied to each backend call.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use gateway::domain::RpcDeadline;
///
/// assert_eq!(RpcDeadline::from_millis(0).duration(), None);
/// assert_eq!(
///     RpcDeadline::from_millis(250).duration(),
///     Some(Duration::from_millis(250))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RpcDeadline(Option<Duration>);

impl RpcDeadline {
    /// No bound beyond the lifetime of the inbound request.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self(None)
    }

    /// Bound calls to `limit`.
    #[must_use]
    pub const fn bounded(limit: Duration) -> Self {
        Self(Some(limit))
    }

    /// Bound calls to `millis` milliseconds; zero means unbounded.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Self::unbounded()
        } else {
            Self::bounded(Duration::from_millis(millis))
        }
    }

    /// Configured bound, if any.
    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        self.0
    }
}

/// Proof that a user owns a chat, obtainable only from
/// [`PaperGatewayService::authorize_chat_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizedChat {
    user_id: UserId,
    chat_id: ChatId,
}

impl AuthorizedChat {
    /// Owner confirmed by the backend's chat listing.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Chat the owner may read and write.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

/// Domain service relaying requests to the semantic backend.
#[derive(Clone)]
pub struct PaperGatewayService {
    backend: Arc<dyn SemanticBackend>,
    deadline: RpcDeadline,
}

impl PaperGatewayService {
    /// Create the service over a backend adapter.
    pub fn new(backend: Arc<dyn SemanticBackend>, deadline: RpcDeadline) -> Self {
        Self { backend, deadline }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, RpcFailure>
    where
        F: Future<Output = Result<T, RpcFailure>>,
    {
        match self.deadline.duration() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(RpcFailure::deadline_exceeded("deadline exceeded"))),
            None => call.await,
        }
    }

    /// Free-text search without a chat association.
    ///
    /// # Errors
    ///
    /// Returns the translated backend failure.
    pub async fn search_papers(&self, text: String) -> Result<Vec<Paper>, Error> {
        let query = SearchQuery {
            text,
            chat_id: None,
        };
        self.bounded(self.backend.search_papers(query))
            .await
            .map_err(|failure| {
                error!(error = %failure, "backend SearchPaper failed");
                Error::from(failure)
            })
    }

    /// Submit a paper; an embedded backend rejection becomes a 400.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] carrying the backend's message when
    /// the paper is rejected, or the translated backend failure.
    pub async fn add_paper(&self, paper: NewPaper) -> Result<(), Error> {
        let paper_id = paper.id.clone();
        let outcome = self
            .bounded(self.backend.add_paper(paper))
            .await
            .map_err(|failure| {
                error!(paper_id = %paper_id, error = %failure, "backend AddPaper failed");
                Error::from(failure)
            })?;
        match outcome {
            AddPaperOutcome::Added => Ok(()),
            AddPaperOutcome::Rejected(message) => {
                warn!(paper_id = %paper_id, reason = %message, "backend rejected paper");
                Err(Error::invalid_request(message))
            }
        }
    }

    /// Create a chat for `chat.user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::bad_gateway`] when the backend replies without a chat,
    /// or the translated backend failure.
    pub async fn create_chat(&self, chat: NewChat) -> Result<Chat, Error> {
        let user_id = chat.user_id;
        self.bounded(self.backend.create_chat(chat))
            .await
            .map_err(|failure| {
                error!(user_id = %user_id, error = %failure, "backend CreateNewChat failed");
                Error::from(failure)
            })?
            .ok_or_else(|| {
                error!(user_id = %user_id, "backend CreateNewChat returned no chat");
                Error::bad_gateway("empty chat response")
            })
    }

    /// Chats owned by `user_id`, in backend order.
    ///
    /// # Errors
    ///
    /// Returns the translated backend failure.
    pub async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, Error> {
        self.bounded(self.backend.list_chats(user_id))
            .await
            .map_err(|failure| {
                error!(user_id = %user_id, error = %failure, "backend GetUserChats failed");
                Error::from(failure)
            })
    }

    /// Confirm `user_id` owns `chat_id` by scanning the user's chat list.
    ///
    /// A chat owned by somebody else is indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::forbidden`] when the chat is not in the list, or the
    /// translated backend failure.
    pub async fn authorize_chat_access(
        &self,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<AuthorizedChat, Error> {
        let chats = self.list_chats(user_id).await?;
        if chats.iter().any(|chat| chat.chat_id == chat_id.get()) {
            Ok(AuthorizedChat { user_id, chat_id })
        } else {
            warn!(user_id = %user_id, chat_id = %chat_id, "chat access denied");
            Err(Error::forbidden("chat access denied"))
        }
    }

    /// Recorded queries of an authorized chat.
    ///
    /// # Errors
    ///
    /// Returns the translated backend failure.
    pub async fn chat_history(&self, chat: &AuthorizedChat) -> Result<Vec<ChatHistoryEntry>, Error> {
        self.bounded(self.backend.chat_history(chat.chat_id))
            .await
            .map_err(|failure| {
                error!(
                    user_id = %chat.user_id,
                    chat_id = %chat.chat_id,
                    error = %failure,
                    "backend GetChatHistory failed"
                );
                Error::from(failure)
            })
    }

    /// Search and record the query against an authorized chat.
    ///
    /// # Errors
    ///
    /// Returns the translated backend failure.
    pub async fn search_in_chat(
        &self,
        chat: &AuthorizedChat,
        text: String,
    ) -> Result<Vec<Paper>, Error> {
        let query = SearchQuery {
            text,
            chat_id: Some(chat.chat_id),
        };
        self.bounded(self.backend.search_papers(query))
            .await
            .map_err(|failure| {
                error!(
                    user_id = %chat.user_id,
                    chat_id = %chat.chat_id,
                    error = %failure,
                    "backend SearchPaper failed"
                );
                Error::from(failure)
            })
    }
}

#[cfg(test)]
#[path = "paper_gateway_service_tests.rs"]
mod tests;
