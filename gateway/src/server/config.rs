//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::web;
use gateway::config::DocsCredentials;
use gateway::inbound::http::state::HttpState;
use url::Url;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) swagger_enabled: bool,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) public_url: Option<Url>,
    pub(crate) docs_credentials: Option<DocsCredentials>,
}

impl ServerConfig {
    /// Construct a server configuration around the shared handler state and
    /// the browser origins admitted by CORS.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState, allowed_origins: Vec<String>) -> Self {
        Self {
            bind_addr,
            http_state: web::Data::new(http_state),
            swagger_enabled: true,
            allowed_origins,
            public_url: None,
            docs_credentials: None,
        }
    }

    /// Toggle Swagger UI and the served OpenAPI document.
    #[must_use]
    pub fn with_swagger(mut self, enabled: bool) -> Self {
        self.swagger_enabled = enabled;
        self
    }

    /// Advertise `public_url` as the OpenAPI server.
    #[must_use]
    pub fn with_public_url(mut self, public_url: Option<Url>) -> Self {
        self.public_url = public_url;
        self
    }

    /// Require basic auth on the docs routes.
    #[must_use]
    pub fn with_docs_credentials(mut self, credentials: Option<DocsCredentials>) -> Self {
        self.docs_credentials = credentials;
        self
    }
}
