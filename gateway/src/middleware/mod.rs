//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns
//! shared by every route: correlation, access logging and the docs guard.

pub mod docs_auth;
pub mod request_log;
pub mod trace;

pub use docs_auth::DocsAuth;
pub use request_log::RequestLog;
pub use trace::Trace;
