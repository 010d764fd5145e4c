//! Shared HTTP adapter state.
//!
//! HTTP handlers and the authentication middleware accept this state via
//! `actix_web::web::Data` so they only depend on domain ports and remain
//! testable without I/O.

use std::sync::Arc;

use crate::domain::PaperGatewayService;
use crate::domain::ports::IdentityResolver;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub papers: PaperGatewayService,
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Construct state from the backend use-cases and the identity resolver.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use gateway::domain::ports::{FixtureIdentityResolver, FixtureSemanticBackend};
    /// use gateway::domain::{PaperGatewayService, RpcDeadline, UserId};
    /// use gateway::inbound::http::state::HttpState;
    ///
    /// let papers = PaperGatewayService::new(
    ///     Arc::new(FixtureSemanticBackend),
    ///     RpcDeadline::unbounded(),
    /// );
    /// let user_id = UserId::new(1).expect("positive id");
    /// let state = HttpState::new(papers, Arc::new(FixtureIdentityResolver::new(user_id)));
    /// let _data = actix_web::web::Data::new(state);
    /// ```
    pub fn new(papers: PaperGatewayService, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { papers, identity }
    }
}
