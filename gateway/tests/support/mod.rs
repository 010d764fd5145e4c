//! Shared doubles and app builders for gateway integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use gateway::domain::ports::{IdentityResolver, RpcFailure, SemanticBackend};
use gateway::domain::{
    AddPaperOutcome, Chat, ChatHistoryEntry, ChatId, NewChat, NewPaper, Paper,
    PaperGatewayService, RpcDeadline, SearchQuery, UserId,
};
use gateway::inbound::http::configure;
use gateway::inbound::http::cors::cors_policy;
use gateway::inbound::http::health::HealthState;
use gateway::inbound::http::state::HttpState;
use gateway::{RequestLog, Trace};

/// A backend call as seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Search { text: String, chat_id: Option<i64> },
    AddPaper { id: String },
    CreateChat { user_id: i64, title: String },
    ListChats { user_id: i64 },
    History { chat_id: i64 },
}

/// Backend double answering from fixed data and recording every call.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
    chats: Vec<Chat>,
    papers: Vec<Paper>,
}

impl RecordingBackend {
    pub fn with_chats(mut self, chats: Vec<Chat>) -> Self {
        self.chats = chats;
        self
    }

    pub fn with_papers(mut self, papers: Vec<Paper>) -> Self {
        self.papers = papers;
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl SemanticBackend for RecordingBackend {
    async fn search_papers(&self, query: SearchQuery) -> Result<Vec<Paper>, RpcFailure> {
        self.record(BackendCall::Search {
            text: query.text,
            chat_id: query.chat_id.map(ChatId::get),
        });
        Ok(self.papers.clone())
    }

    async fn add_paper(&self, paper: NewPaper) -> Result<AddPaperOutcome, RpcFailure> {
        self.record(BackendCall::AddPaper { id: paper.id });
        Ok(AddPaperOutcome::Added)
    }

    async fn create_chat(&self, chat: NewChat) -> Result<Option<Chat>, RpcFailure> {
        self.record(BackendCall::CreateChat {
            user_id: chat.user_id.get(),
            title: chat.title.clone(),
        });
        Ok(Some(Chat {
            chat_id: 100,
            user_id: chat.user_id.get(),
            updated_at: "2024-05-01T10:00:00Z".to_owned(),
            title: chat.title,
        }))
    }

    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, RpcFailure> {
        self.record(BackendCall::ListChats {
            user_id: user_id.get(),
        });
        Ok(self
            .chats
            .iter()
            .filter(|chat| chat.user_id == user_id.get())
            .cloned()
            .collect())
    }

    async fn chat_history(&self, chat_id: ChatId) -> Result<Vec<ChatHistoryEntry>, RpcFailure> {
        self.record(BackendCall::History {
            chat_id: chat_id.get(),
        });
        Ok(vec![ChatHistoryEntry {
            search_query: "graph neural networks".to_owned(),
            created_at: "2024-05-02T08:30:00Z".to_owned(),
            papers: self.papers.clone(),
        }])
    }
}

pub fn chat(chat_id: i64, user_id: i64) -> Chat {
    Chat {
        chat_id,
        user_id,
        updated_at: "2024-05-01T10:00:00Z".to_owned(),
        title: format!("chat {chat_id}"),
    }
}

pub fn paper(id: &str) -> Paper {
    Paper {
        id: id.to_owned(),
        title: format!("title {id}"),
        abstract_text: format!("abstract {id}"),
        year: 2021,
        best_oa_location: format!("https://oa.example/{id}"),
    }
}

/// Browser origin admitted by [`gateway_app`].
pub const APP_ORIGIN: &str = "https://app.example";

/// The gateway app as served in production, over the given adapters.
pub fn gateway_app(
    backend: Arc<dyn SemanticBackend>,
    identity: Arc<dyn IdentityResolver>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let papers = PaperGatewayService::new(backend, RpcDeadline::unbounded());
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(health))
        .app_data(web::Data::new(HttpState::new(papers, identity)))
        .wrap(cors_policy(&[APP_ORIGIN.to_owned()]))
        .wrap(RequestLog)
        .wrap(Trace)
        .configure(configure)
}
