//! Domain primitives, ports and use-cases.
//!
//! Purpose: keep routing, identity and authorization decisions independent of
//! Actix, reqwest and tonic. Adapters depend on this module, never the other
//! way round.
//!
//! Public surface:
//! - [`Error`]/[`ErrorCode`]: transport-agnostic failures.
//! - [`UserId`]/[`ChatId`]: validated positive identifiers.
//! - [`BearerToken`]/[`Caller`]/[`resolve_user_id`]: caller identity.
//! - [`PaperGatewayService`]: deadline-bounded backend use-cases.
//! - [`ports`]: backend and identity service boundaries.

pub mod error;
pub mod identity;
pub mod ids;
pub mod paper_gateway_service;
pub mod papers;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::identity::{BearerToken, Caller, resolve_user_id};
pub use self::ids::{ChatId, IdValidationError, UserId};
pub use self::paper_gateway_service::{AuthorizedChat, PaperGatewayService, RpcDeadline};
pub use self::papers::{
    AddPaperOutcome, Chat, ChatHistoryEntry, NewChat, NewPaper, Paper, SearchQuery,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
