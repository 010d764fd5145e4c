//! Wire payloads shared by every HTTP handler.
//!
//! Domain types stay framework-agnostic and never derive `ToSchema`; the
//! serialisable shapes live here in the adapter layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Chat, ChatHistoryEntry, Paper};

/// Error envelope returned on every failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure message.
    #[schema(example = "chat access denied")]
    pub error: String,
}

/// Paper as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaperBody {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[schema(example = 2021)]
    pub year: i64,
    #[schema(example = "https://arxiv.org/abs/1706.03762")]
    pub best_oa_location: String,
}

/// Search results in backend order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PapersResponse {
    pub papers: Vec<PaperBody>,
}

/// Chat record in the flat shape used by every chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatBody {
    #[schema(example = 7)]
    pub chat_id: i64,
    #[schema(example = 42)]
    pub user_id: i64,
    pub updated_at: String,
    pub title: String,
}

/// Chats owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatsResponse {
    pub chats: Vec<ChatBody>,
}

/// One recorded query of a chat.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageBody {
    pub search_query: String,
    pub created_at: String,
    pub papers: Vec<PaperBody>,
}

/// Recorded queries of a chat, oldest first as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub chat_messages: Vec<ChatMessageBody>,
}

impl From<Paper> for PaperBody {
    fn from(paper: Paper) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            abstract_text: paper.abstract_text,
            year: paper.year,
            best_oa_location: paper.best_oa_location,
        }
    }
}

impl From<Vec<Paper>> for PapersResponse {
    fn from(papers: Vec<Paper>) -> Self {
        Self {
            papers: papers.into_iter().map(PaperBody::from).collect(),
        }
    }
}

impl From<Chat> for ChatBody {
    fn from(chat: Chat) -> Self {
        Self {
            chat_id: chat.chat_id,
            user_id: chat.user_id,
            updated_at: chat.updated_at,
            title: chat.title,
        }
    }
}

impl From<ChatHistoryEntry> for ChatMessageBody {
    fn from(entry: ChatHistoryEntry) -> Self {
        Self {
            search_query: entry.search_query,
            created_at: entry.created_at,
            papers: entry.papers.into_iter().map(PaperBody::from).collect(),
        }
    }
}
