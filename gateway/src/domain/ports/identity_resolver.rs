//! Driven port for resolving bearer tokens into callers.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{BearerToken, Caller, Error, ErrorCode, UserId};

define_port_error! {
    /// Reasons a token could not be turned into a caller.
    pub enum IdentityError {
        /// No identity service base URL was configured.
        NotConfigured => "identity service url not configured",
        /// The identity service could not be reached or timed out.
        Unreachable { message: String } => "{message}",
        /// The identity service answered with a non-200 status.
        Rejected { status: u16, message: String } => "{message}",
    }
}

impl From<IdentityError> for Error {
    fn from(err: IdentityError) -> Self {
        let code = match &err {
            IdentityError::NotConfigured | IdentityError::Unreachable { .. } => {
                ErrorCode::BadGateway
            }
            IdentityError::Rejected { status, .. } => ErrorCode::IdentityRejected(*status),
        };
        Self::new(code, err.to_string())
    }
}

/// Turns a bearer token into a [`Caller`] by asking the identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Validate the token remotely and extract the caller id, if any.
    async fn resolve(&self, token: &BearerToken) -> Result<Caller, IdentityError>;
}

/// Fixture resolver accepting every token as the same user.
#[derive(Debug, Clone, Copy)]
pub struct FixtureIdentityResolver {
    user_id: UserId,
}

impl FixtureIdentityResolver {
    /// Accept every token as `user_id`.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl IdentityResolver for FixtureIdentityResolver {
    async fn resolve(&self, _token: &BearerToken) -> Result<Caller, IdentityError> {
        Ok(Caller::identified(self.user_id))
    }
}

/// Resolver used when no identity service is configured; every token fails
/// with [`IdentityError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredIdentityResolver;

#[async_trait]
impl IdentityResolver for UnconfiguredIdentityResolver {
    async fn resolve(&self, _token: &BearerToken) -> Result<Caller, IdentityError> {
        Err(IdentityError::not_configured())
    }
}
