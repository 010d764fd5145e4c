//! Generated `semantic` protobuf types and their domain conversions.
//!
//! `build.rs` compiles `proto/semantic.proto`; the conversions below keep wire
//! types from leaking past the adapter.

tonic::include_proto!("semantic");

use crate::domain::{Chat as DomainChat, ChatHistoryEntry, NewChat, NewPaper, Paper, SearchQuery};

impl From<SearchQuery> for SearchRequest {
    fn from(query: SearchQuery) -> Self {
        Self {
            input_data: query.text,
            chat_id: query.chat_id.map_or(0, |chat_id| chat_id.get()),
        }
    }
}

impl From<NewPaper> for AddRequest {
    fn from(paper: NewPaper) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            r#abstract: paper.abstract_text,
            year: paper.year,
            best_oa_location: paper.best_oa_location,
            referenced_works: paper
                .referenced_works
                .into_iter()
                .map(|id| ReferencedWorks { id })
                .collect(),
            related_works: paper
                .related_works
                .into_iter()
                .map(|id| RelatedWorks { id })
                .collect(),
        }
    }
}

impl From<NewChat> for Chat {
    fn from(chat: NewChat) -> Self {
        Self {
            chat_id: 0,
            user_id: chat.user_id.get(),
            updated_at: String::new(),
            title: chat.title,
        }
    }
}

impl From<PaperResponse> for Paper {
    fn from(paper: PaperResponse) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            abstract_text: paper.r#abstract,
            year: paper.year,
            best_oa_location: paper.best_oa_location,
        }
    }
}

impl From<Chat> for DomainChat {
    fn from(chat: Chat) -> Self {
        Self {
            chat_id: chat.chat_id,
            user_id: chat.user_id,
            updated_at: chat.updated_at,
            title: chat.title,
        }
    }
}

impl From<ChatMessage> for ChatHistoryEntry {
    fn from(message: ChatMessage) -> Self {
        Self {
            search_query: message.search_query,
            created_at: message.created_at,
            papers: message
                .papers
                .map(|list| list.papers.into_iter().map(Paper::from).collect())
                .unwrap_or_default(),
        }
    }
}
