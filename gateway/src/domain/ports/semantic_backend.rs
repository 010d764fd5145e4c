//! Driven port for the semantic search backend.
//!
//! The backend is an opaque RPC service. The domain only sees typed calls and
//! a closed vocabulary of failures, so handlers and authorization logic can
//! be exercised against substitutes without a network.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AddPaperOutcome, Chat, ChatHistoryEntry, ChatId, Error, ErrorCode, NewChat, NewPaper, Paper,
    SearchQuery, UserId,
};

define_port_error! {
    /// Failure reported by, or while reaching, the backend.
    pub enum RpcFailure {
        /// The backend rejected the arguments.
        InvalidArgument { message: String } => "{message}",
        /// The backend has no such resource.
        NotFound { message: String } => "{message}",
        /// The call outlived its deadline.
        DeadlineExceeded { message: String } => "{message}",
        /// The backend is not reachable right now.
        Unavailable { message: String } => "{message}",
        /// The backend refused the caller.
        PermissionDenied { message: String } => "{message}",
        /// The backend did not accept the caller's credentials.
        Unauthenticated { message: String } => "{message}",
        /// Any other status, or a transport failure without a status.
        Other { message: String } => "{message}",
    }
}

impl RpcFailure {
    /// Message reported by the backend or the transport.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message }
            | Self::NotFound { message }
            | Self::DeadlineExceeded { message }
            | Self::Unavailable { message }
            | Self::PermissionDenied { message }
            | Self::Unauthenticated { message }
            | Self::Other { message } => message.as_str(),
        }
    }
}

impl From<RpcFailure> for Error {
    /// Translate backend status codes into gateway error categories.
    fn from(failure: RpcFailure) -> Self {
        let code = match &failure {
            RpcFailure::InvalidArgument { .. } => ErrorCode::InvalidRequest,
            RpcFailure::NotFound { .. } => ErrorCode::NotFound,
            RpcFailure::DeadlineExceeded { .. } => ErrorCode::GatewayTimeout,
            RpcFailure::PermissionDenied { .. } | RpcFailure::Unauthenticated { .. } => {
                ErrorCode::Unauthorized
            }
            RpcFailure::Unavailable { .. } | RpcFailure::Other { .. } => ErrorCode::BadGateway,
        };
        Self::new(code, failure.message())
    }
}

/// Typed capability interface of the semantic backend.
///
/// Implementations must be usable from many requests at once.
///
/// # Examples
///
/// ```rust
/// # async fn example() -> Result<(), gateway::domain::ports::RpcFailure> {
/// use gateway::domain::ports::{FixtureSemanticBackend, SemanticBackend};
/// use gateway::domain::UserId;
///
/// let backend = FixtureSemanticBackend;
/// let user_id = UserId::new(1).expect("positive id");
/// assert!(backend.list_chats(user_id).await?.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SemanticBackend: Send + Sync {
    /// Run a search, optionally recording it against a chat.
    async fn search_papers(&self, query: SearchQuery) -> Result<Vec<Paper>, RpcFailure>;

    /// Submit a paper for indexing.
    async fn add_paper(&self, paper: NewPaper) -> Result<AddPaperOutcome, RpcFailure>;

    /// Create a chat. `None` means the backend replied without a chat record.
    async fn create_chat(&self, chat: NewChat) -> Result<Option<Chat>, RpcFailure>;

    /// List the chats owned by a user, in backend order.
    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, RpcFailure>;

    /// Fetch the recorded queries of a chat, in backend order.
    async fn chat_history(&self, chat_id: ChatId) -> Result<Vec<ChatHistoryEntry>, RpcFailure>;
}

/// Fixture backend that knows no papers and no chats.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSemanticBackend;

#[async_trait]
impl SemanticBackend for FixtureSemanticBackend {
    async fn search_papers(&self, _query: SearchQuery) -> Result<Vec<Paper>, RpcFailure> {
        Ok(Vec::new())
    }

    async fn add_paper(&self, _paper: NewPaper) -> Result<AddPaperOutcome, RpcFailure> {
        Ok(AddPaperOutcome::Added)
    }

    async fn create_chat(&self, chat: NewChat) -> Result<Option<Chat>, RpcFailure> {
        Ok(Some(Chat {
            chat_id: 1,
            user_id: chat.user_id.get(),
            updated_at: String::new(),
            title: chat.title,
        }))
    }

    async fn list_chats(&self, _user_id: UserId) -> Result<Vec<Chat>, RpcFailure> {
        Ok(Vec::new())
    }

    async fn chat_history(&self, chat_id: ChatId) -> Result<Vec<ChatHistoryEntry>, RpcFailure> {
        Err(RpcFailure::not_found(format!("chat {chat_id} not found")))
    }
}
