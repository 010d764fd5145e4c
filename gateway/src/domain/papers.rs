//! Papers, chats and chat history as exchanged with the semantic backend.
//!
//! These are plain values copied between wire representations. Records that
//! originate in the backend keep its raw integer ids; only ids supplied by
//! clients go through [`UserId`]/[`ChatId`] validation.

use super::{ChatId, UserId};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paper {
    /// Backend paper identifier.
    pub id: String,
    /// Paper title.
    pub title: String,
    /// Paper abstract.
    pub abstract_text: String,
    /// Publication year.
    pub year: i64,
    /// Best open-access location URL.
    pub best_oa_location: String,
}

/// Search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query.
    pub text: String,
    /// Chat the query is recorded against, if any.
    pub chat_id: Option<ChatId>,
}

/// Paper submitted for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPaper {
    /// Backend paper identifier.
    pub id: String,
    /// Paper title.
    pub title: String,
    /// Paper abstract.
    pub abstract_text: String,
    /// Publication year.
    pub year: i64,
    /// Best open-access location URL.
    pub best_oa_location: String,
    /// Ids of works this paper cites.
    pub referenced_works: Vec<String>,
    /// Ids of related works.
    pub related_works: Vec<String>,
}

/// Result of an add-paper call that reached the backend.
///
/// A transport-level success can still carry an application-level rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPaperOutcome {
    /// The paper was accepted.
    Added,
    /// The backend refused the paper with this message.
    Rejected(String),
}

/// Chat creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    /// Owner of the new chat.
    pub user_id: UserId,
    /// Chat title.
    pub title: String,
}

/// Chat record as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chat {
    /// Chat identifier.
    pub chat_id: i64,
    /// Owner user id.
    pub user_id: i64,
    /// Last update timestamp, formatted by the backend.
    pub updated_at: String,
    /// Chat title.
    pub title: String,
}

/// One recorded query in a chat and the papers it produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatHistoryEntry {
    /// Query text.
    pub search_query: String,
    /// Creation timestamp, formatted by the backend.
    pub created_at: String,
    /// Papers returned for the query, in backend order.
    pub papers: Vec<Paper>,
}
