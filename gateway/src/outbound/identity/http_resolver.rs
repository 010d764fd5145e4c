//! Reqwest-backed identity resolver.
//!
//! The adapter owns transport details only: building the validation request,
//! bounding it with a timeout, mapping failures, and reading the caller id
//! from a successful reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, warn};

use super::extractors::{ValidationReply, extract_user_id};
use crate::domain::ports::{IdentityError, IdentityResolver};
use crate::domain::{BearerToken, Caller};

/// Path of the validation endpoint relative to the identity service base.
pub const VALIDATE_PATH: &str = "/api/auth/validate";

/// Timeout used when no positive RPC timeout is configured.
pub const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

const REJECTION_BODY_LIMIT: usize = 2048;
const FALLBACK_REJECTION_MESSAGE: &str = "invalid token";

/// Errors raised while constructing [`HttpIdentityResolver`].
#[derive(Debug, thiserror::Error)]
pub enum IdentityClientBuildError {
    /// The base URL cannot be extended with the validation path.
    #[error("invalid identity service url: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build identity http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Identity resolver calling `GET <base>/api/auth/validate`.
pub struct HttpIdentityResolver {
    client: Client,
    validate_url: Url,
}

impl HttpIdentityResolver {
    /// Build a resolver for the identity service at `base`.
    ///
    /// Trailing slashes on `base` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when the validation URL cannot be formed or the
    /// reqwest client cannot be constructed.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, IdentityClientBuildError> {
        let validate_url = Url::parse(&format!(
            "{}{VALIDATE_PATH}",
            base.as_str().trim_end_matches('/')
        ))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            validate_url,
        })
    }

    /// Fully qualified validation endpoint.
    #[must_use]
    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, token: &BearerToken) -> Result<Caller, IdentityError> {
        debug!(target_url = %self.validate_url, "validating bearer token");
        let response = self
            .client
            .get(self.validate_url.clone())
            .header(AUTHORIZATION, token.header_value())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = read_prefix(response, REJECTION_BODY_LIMIT).await;
            let message = rejection_message(&body);
            warn!(status = status.as_u16(), reason = %message, "identity service rejected token");
            return Err(IdentityError::rejected(status.as_u16(), message));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        let user_id = extract_user_id(&ValidationReply {
            headers: &headers,
            body: body.as_ref(),
            token,
        });
        if user_id.is_none() {
            debug!("token accepted without a caller id");
        }
        Ok(user_id.map_or_else(Caller::anonymous, Caller::identified))
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityError {
    if error.is_timeout() {
        IdentityError::unreachable(format!("identity service timed out: {error}"))
    } else {
        IdentityError::unreachable(error.to_string())
    }
}

/// Read at most `limit` bytes of the body; a broken stream ends the read.
async fn read_prefix(mut response: Response, limit: usize) -> Vec<u8> {
    let mut buffer = Vec::new();
    while buffer.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let remaining = limit - buffer.len();
                buffer.extend(chunk.iter().take(remaining));
            }
            Ok(None) | Err(_) => break,
        }
    }
    buffer
}

/// Prefer a JSON `error`/`message` field, then the trimmed text body.
fn rejection_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    let from_json = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| {
            ["error", "message"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|message| !message.is_empty())
                    .map(str::to_owned)
            })
        });
    match from_json {
        Some(message) => message,
        None if text.is_empty() => FALLBACK_REJECTION_MESSAGE.to_owned(),
        None => text.to_owned(),
    }
}
