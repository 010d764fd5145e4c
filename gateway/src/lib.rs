//! Paper gateway library modules.
//!
//! A REST/JSON facade over the semantic search backend: bearer tokens are
//! validated by the identity service, chat access is checked against the
//! caller's chat list, and every operation is relayed to the backend over
//! gRPC.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{DocsAuth, RequestLog, Trace};
